pub mod email;
pub mod letters;
pub mod pdf;
pub mod template;
