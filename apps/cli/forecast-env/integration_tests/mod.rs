mod error;
mod root;
mod stamp_request;
