//! Trigger the ingestion of a file sitting in a user's inbox.

use cega_core::{Checksum, EventPayload};
use cega_mq::ops::publish_event;
use cega_mq::{Broker, MqResult};
use uuid::Uuid;

#[derive(clap::Args)]
pub struct PublishArgs {
    /// Elixir ID
    pub user: String,
    /// Filepath in the user's inbox
    pub filepath: String,

    /// Encrypted-file checksum
    #[arg(long)]
    pub enc: Option<String>,
    #[arg(long, default_value = "md5")]
    pub enc_algo: String,

    /// Unencrypted-file checksum
    #[arg(long)]
    pub unenc: Option<String>,
    #[arg(long, default_value = "md5")]
    pub unenc_algo: String,
}

pub async fn run(broker: &dyn Broker, args: PublishArgs) -> MqResult<i32> {
    let stable_id = format!("EGAF_{}", Uuid::new_v4());
    println!("Ingesting file {stable_id}");

    let mut payload = EventPayload::new(args.user, args.filepath);
    payload.stable_id = Some(stable_id);
    payload.encrypted_integrity = args.enc.map(|checksum| Checksum {
        checksum,
        algorithm: args.enc_algo,
    });
    payload.unencrypted_integrity = args.unenc.map(|checksum| Checksum {
        checksum,
        algorithm: args.unenc_algo,
    });

    let body = serde_json::to_value(&payload)?;
    publish_event(broker, "files", &body, None).await?;
    println!("Message published to CentralEGA");
    Ok(0)
}
