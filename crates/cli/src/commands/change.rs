//! Single quantity change.

use std::sync::Arc;

use basket_sync::{
    config::ClientConfig,
    events::InputElement,
    handler::QuantityChangeHandler,
    region::{CartRegion, MemoryRegion},
    transport::HttpTransport,
};
use tracing::info;

use crate::{config::ChangeArgs, errors::CliError};

pub(crate) async fn run(args: ChangeArgs, client: &ClientConfig) -> Result<(), CliError> {
    let transport = HttpTransport::from_config(client)?;
    let region = MemoryRegion::default();

    let handler = QuantityChangeHandler::new(
        Arc::new(transport),
        Arc::new(region.clone()),
        client.apply_policy,
    );

    let outcome = handler
        .on_quantity_changed(&InputElement::number(args.item, args.quantity))
        .await?;

    if outcome.removed {
        info!(item = %outcome.item, "line removed from basket");
    }

    #[expect(clippy::print_stdout, reason = "rendered cart is the command output")]
    {
        println!("{}", region.contents());
    }

    Ok(())
}
