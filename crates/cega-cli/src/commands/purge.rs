//! Reset queues by discarding everything in them. Test tooling only;
//! never part of the production flow.

use cega_mq::ops::purge_queues;
use cega_mq::{topology, Broker, MqResult};

#[derive(clap::Args)]
pub struct PurgeArgs {
    /// Comma-separated list of queues; defaults to the full v1 set
    #[arg(long, value_delimiter = ',')]
    pub queues: Vec<String>,
}

pub async fn run(broker: &dyn Broker, args: PurgeArgs) -> MqResult<i32> {
    let queues = if args.queues.is_empty() {
        topology::QUEUES.iter().map(|queue| queue.to_string()).collect()
    } else {
        args.queues
    };
    for (queue, count) in purge_queues(broker, &queues).await? {
        println!("Clean slate for {queue} ({count} messages dropped)");
    }
    Ok(0)
}
