//! Dump the message with a given correlation id to stdout.

use cega_mq::ops::fetch_by_correlation;
use cega_mq::{Broker, MqError, MqResult};

use super::EXIT_NO_MATCH;

#[derive(clap::Args)]
pub struct GetArgs {
    /// Queue to read
    pub queue: String,
    /// Correlation id to fetch
    pub correlation_id: String,
}

pub async fn run(broker: &dyn Broker, args: GetArgs) -> MqResult<i32> {
    match fetch_by_correlation(broker, &args.queue, &args.correlation_id).await {
        Ok(hit) => {
            let fields = match hit.body.as_object() {
                Some(object) => object
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>()
                    .join("\t"),
                None => hit.body.to_string(),
            };
            println!("Message id: {} | {fields}", hit.delivery_tag);
            Ok(0)
        }
        Err(MqError::NoMatch) => Ok(EXIT_NO_MATCH),
        Err(err) => Err(err),
    }
}
