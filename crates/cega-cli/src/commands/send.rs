//! Publish a raw JSON message under any routing key.

use cega_mq::ops::publish_event;
use cega_mq::{Broker, MqResult};

#[derive(clap::Args)]
pub struct SendArgs {
    /// Routing key for the CentralEGA exchange
    pub routing_key: String,
    /// A JSON-formatted string
    pub message: String,
}

pub async fn run(broker: &dyn Broker, args: SendArgs) -> MqResult<i32> {
    // Parse up front so malformed input never reaches the broker.
    let body: serde_json::Value = serde_json::from_str(&args.message)?;
    let correlation_id = publish_event(broker, &args.routing_key, &body, None).await?;
    println!("Message published to CentralEGA ({correlation_id})");
    Ok(0)
}
