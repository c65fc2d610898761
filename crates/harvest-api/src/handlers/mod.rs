pub mod vegetable_upload;
