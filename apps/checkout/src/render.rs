use checkout_core::{
    view::{RowView, TotalsView},
    CheckoutPhase, CheckoutSnapshot,
};

pub fn render_snapshot(snapshot: &CheckoutSnapshot) -> String {
    match &snapshot.phase {
        CheckoutPhase::Loading => "Loading catalog...".to_string(),
        CheckoutPhase::Empty => "No products available right now. Type `retry` to reload.".to_string(),
        CheckoutPhase::Failed(reason) => {
            format!("Could not load the catalog: {reason}\nType `retry` to try again.")
        }
        CheckoutPhase::Ready => render_ready(snapshot),
    }
}

fn render_ready(snapshot: &CheckoutSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<24} {:>9} {:>10} {:>8} {:>12}  {}\n",
        "ID", "Product Name", "Available", "Price (₹)", "Quantity", "Total", "Actions"
    ));

    for row in snapshot.rows.iter().map(RowView::from) {
        let actions = format!(
            "{} {}",
            if row.can_increase { "[add]" } else { "     " },
            if row.can_decrease { "[remove]" } else { "" }
        );
        out.push_str(&format!(
            "{:>4}  {:<24} {:>9} {:>10} {:>8} {:>12}  {}\n",
            row.id.0,
            row.name,
            row.available,
            format!("₹{}", row.price),
            row.quantity,
            format!("₹{}", row.total),
            actions.trim_end()
        ));
    }

    let totals = TotalsView::from(&snapshot.totals);
    out.push_str("\nOrder Details\n");
    out.push_str(&format!("Subtotal: ₹ {}\n", totals.subtotal));
    out.push_str(&format!("GST: ₹ {}\n", totals.tax));
    out.push_str(&format!("Total: ₹ {}", totals.grand_total));
    out
}
