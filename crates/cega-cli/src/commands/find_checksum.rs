//! Look up a correlation id by encrypted-file checksum.

use cega_mq::ops::find_by_checksum;
use cega_mq::{Broker, MqError, MqResult};

use super::EXIT_NO_MATCH;

#[derive(clap::Args)]
pub struct FindChecksumArgs {
    /// Queue to read
    pub queue: String,
    /// Encrypted-integrity checksum to search for
    pub checksum: String,

    /// Among duplicates, pick the most recent delivery
    #[arg(long)]
    pub latest: bool,
}

pub async fn run(broker: &dyn Broker, args: FindChecksumArgs) -> MqResult<i32> {
    match find_by_checksum(broker, &args.queue, &args.checksum, args.latest).await {
        Ok(correlation_id) => {
            println!("{correlation_id}");
            Ok(0)
        }
        Err(MqError::NoMatch) => Ok(EXIT_NO_MATCH),
        Err(err) => Err(err),
    }
}
