// Text acquisition: uploaded file -> resume text.
// PDFs go through the decoder and then the line reconstructor.

pub mod acquisition;
pub mod handlers;
pub mod lines;
pub mod pdf;
