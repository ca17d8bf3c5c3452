pub mod broker;
pub mod rbmq;
