use tracing::debug;

use crate::dom::Document;

/// Show `message` in the error area `area_id`, making the area visible.
///
/// Without an error area this does nothing; the caller still has the error to log.
pub fn report_error(document: &mut Document, area_id: &str, message: &str) {
    let Some(area) = document.element_by_id_mut(area_id) else {
        debug!(area_id, "error area not found, message not shown");
        return;
    };
    area.set_style("display", "block");
    area.set_text(message);
}
