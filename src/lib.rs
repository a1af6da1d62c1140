//! S3-triggered Lambda that resizes newly uploaded JPEG images.
//!
//! On each "object created" notification the function fetches the object
//! from the source bucket, resizes it to a fixed 800x600 JPEG, uploads the
//! result under a `resized-` key to a second bucket, and records the
//! transformation in a DynamoDB table. The four steps run strictly in order
//! and the first failure aborts the invocation; nothing is retried or
//! rolled back.

pub mod config;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod resize;
pub mod store;
