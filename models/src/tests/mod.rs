mod dependency;
mod request_batch;
mod retrieval;
