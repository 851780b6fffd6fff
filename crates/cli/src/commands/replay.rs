//! Replay scripted change events against a mounted cart view.

use std::sync::Arc;

use basket_sync::{
    config::ClientConfig,
    events::InputElement,
    region::{CartRegion, MemoryRegion},
    subscription::{CartView, UpdateReport, mount},
    transport::HttpTransport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{
    config::ReplayArgs,
    errors::{CliError, error_chain},
};

pub(crate) async fn run(args: ReplayArgs, client: &ClientConfig) -> Result<(), CliError> {
    let transport = HttpTransport::from_config(client)?;
    let region = MemoryRegion::new(args.initial);
    let view = CartView::new(Arc::new(region.clone()));

    let mut subscription = mount(&view, Arc::new(transport), client.apply_policy)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = 0_usize;

    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_line(&line) else {
            continue;
        };

        let counts = input.is_quantity_input();

        if view.dispatch_change(input) && counts {
            pending += 1;
        }
    }

    debug!(pending, "input exhausted, waiting for updates");

    for _ in 0..pending {
        let Some(report) = subscription.next_report().await else {
            break;
        };

        #[expect(clippy::print_stdout, reason = "report lines are the command output")]
        {
            println!("{}", format_report(&report));
        }
    }

    subscription.dispose();

    #[expect(clippy::print_stdout, reason = "rendered cart is the command output")]
    {
        println!("{}", region.contents());
    }

    Ok(())
}

/// Parse a `NAME VALUE [TYPE]` line. Blank lines and `#` comments yield
/// `None`; a missing value is passed on as empty.
fn parse_line(line: &str) -> Option<InputElement> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace();

    let name = fields.next()?;
    let value = fields.next().unwrap_or_default();
    let input_type = fields.next().unwrap_or("number");

    Some(InputElement::new(input_type, name, value))
}

fn format_report(report: &UpdateReport) -> String {
    match &report.result {
        Ok(outcome) if outcome.applied => format!("applied {} {}", outcome.item, outcome.quantity),
        Ok(outcome) => format!("stale {} {}", outcome.item, outcome.quantity),
        Err(error) => format!(
            "failed {} {:?}: {}",
            report.input.name,
            report.input.value,
            error_chain(error)
        ),
    }
}
