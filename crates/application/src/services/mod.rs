mod response_capture;

pub use response_capture::ResponseCapture;
