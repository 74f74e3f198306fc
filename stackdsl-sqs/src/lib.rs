//! SQS blueprint for stackdsl
//!
//! Declares a single parameterized queue:
//! - input parameter `Queuename`
//! - an `AWS::SQS::Queue` resource named by it
//! - an exported output referencing the queue

pub mod queue;

pub use queue::queue_template;
