mod ort_session;

pub use ort_session::OrtSession;
