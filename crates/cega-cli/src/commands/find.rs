//! Look up correlation ids by user and filepath. The matching messages
//! are consumed; everything else stays on the queue.

use cega_mq::ops::{find_all_by_ownership, find_by_ownership};
use cega_mq::{Broker, MqError, MqResult};

use super::EXIT_NO_MATCH;

#[derive(clap::Args)]
pub struct FindArgs {
    /// Queue to read
    pub queue: String,
    /// Elixir ID
    pub user: String,
    /// One filepath, or several for an all-or-fail lookup
    #[arg(required = true)]
    pub filepaths: Vec<String>,

    /// Among duplicates, pick the most recent delivery
    #[arg(long)]
    pub latest: bool,
}

pub async fn run(broker: &dyn Broker, args: FindArgs) -> MqResult<i32> {
    if args.filepaths.len() == 1 {
        match find_by_ownership(broker, &args.queue, &args.user, &args.filepaths[0], args.latest)
            .await
        {
            Ok(correlation_id) => {
                println!("{correlation_id}");
                Ok(0)
            }
            Err(MqError::NoMatch) => Ok(EXIT_NO_MATCH),
            Err(err) => Err(err),
        }
    } else {
        match find_all_by_ownership(broker, &args.queue, &args.user, &args.filepaths).await {
            Ok(found) => {
                // Keep the caller's order.
                for filepath in &args.filepaths {
                    if let Some(correlation_id) = found.get(filepath) {
                        println!("{filepath}\t{correlation_id}");
                    }
                }
                Ok(0)
            }
            Err(MqError::NoMatch) => Ok(EXIT_NO_MATCH),
            Err(err) => Err(err),
        }
    }
}
