// src/shipment/listing.rs

use super::Shipment;

const NO_STATUS: &str = "-";

fn delivered_label(delivered: bool) -> &'static str {
    if delivered { "delivered" } else { "in transit" }
}

/// Render one shipment as a summary line or a detail block
pub fn render_row(item: usize, shipment: &Shipment, detailed: bool) -> String {
    let status = if shipment.carrier_status.is_empty() {
        NO_STATUS
    } else {
        shipment.carrier_status.as_str()
    };

    if detailed {
        format!(
            "Item:        {}\n\
             Tracking:    {}\n\
             Description: {}\n\
             Delivered:   {}\n\
             Status:      {}\n",
            item,
            shipment.tracking_number,
            shipment.description,
            if shipment.delivered { "yes" } else { "no" },
            status,
        )
    } else {
        format!(
            "{:>3}  {:<22}  {:<24}  {:<10}  {}",
            item,
            shipment.tracking_number,
            shipment.description,
            delivered_label(shipment.delivered),
            status,
        )
    }
}
