//! `pricing` command implementation.

use crate::core::models::PricingPayload;
use crate::core::pricing::PricingTable;
use crate::error::Result;
use crate::render;
use crate::storage::ResolvedConfig;

/// Print the pricing table used for token estimates.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn execute(config: &ResolvedConfig, no_color: bool) -> Result<()> {
    let payload = PricingPayload::from_table(&PricingTable::current());
    let output = render::render_pricing(payload, config.format, config.pretty, no_color)?;
    print!("{output}");
    Ok(())
}
