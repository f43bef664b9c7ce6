//! Plain-text tables and reports written to the terminal.

use std::io::{self, Write};

use stockroom_auth::{Principal, Role, UserDirectory};
use stockroom_inventory::{InventoryItem, Transaction, ValueReport};

const RULE_WIDTH: usize = 86;

/// `1234.5` -> `$1,234.50`.
pub fn money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Cut to `width` characters, marking the cut with `~`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

pub fn item_table<'a>(
    out: &mut impl Write,
    items: impl IntoIterator<Item = &'a InventoryItem>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<20} {:<14} {:>10} {:>8} {:>7} {:>12}  {}",
        "Name", "Category", "Price", "Qty", "Reorder", "Value", "Status"
    )?;
    rule(out)?;

    let mut total = 0.0;
    let mut count = 0;
    for item in items {
        total += item.value();
        count += 1;
        writeln!(
            out,
            "{:<20} {:<14} {:>10} {:>8} {:>7} {:>12}  {}",
            fit(&item.name, 20),
            fit(&item.category, 14),
            money(item.price),
            item.quantity,
            item.reorder_level,
            money(item.value()),
            item.status().label()
        )?;
    }

    rule(out)?;
    writeln!(out, "{count} item(s), total value {}", money(total))
}

pub fn item_details(out: &mut impl Write, item: &InventoryItem) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {} ===", item.name)?;
    writeln!(out, "Category:      {}", item.category)?;
    writeln!(out, "Price:         {}", money(item.price))?;
    writeln!(out, "Quantity:      {}", item.quantity)?;
    writeln!(out, "Reorder level: {}", item.reorder_level)?;
    writeln!(out, "Total value:   {}", money(item.value()))?;
    writeln!(out, "Status:        {}", item.status().label())?;

    if let (Some(at), Some(by)) = (item.added_at, item.added_by.as_deref()) {
        writeln!(out, "Added:         {} by {by}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    if let (Some(at), Some(by)) = (item.updated_at, item.updated_by.as_deref()) {
        writeln!(out, "Last updated:  {} by {by}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    Ok(())
}

pub fn transactions(out: &mut impl Write, entries: &[&Transaction]) -> io::Result<()> {
    writeln!(
        out,
        "{:<19}  {:<8} {:<20} {:>6}  {:<12} {}",
        "When (UTC)", "Type", "Item", "Qty", "User", "Notes"
    )?;
    rule(out)?;
    for t in entries {
        writeln!(
            out,
            "{:<19}  {:<8} {:<20} {:>6}  {:<12} {}",
            t.at.format("%Y-%m-%d %H:%M:%S"),
            t.kind,
            fit(&t.item, 20),
            t.quantity,
            fit(&t.user, 12),
            t.notes
        )?;
    }
    Ok(())
}

pub fn categories(out: &mut impl Write, names: &[&str]) -> io::Result<()> {
    writeln!(out, "Categories ({}):", names.len())?;
    for name in names {
        writeln!(out, "  - {name}")?;
    }
    Ok(())
}

pub fn value_report(out: &mut impl Write, report: &ValueReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Inventory Value Report ===")?;
    writeln!(out, "Items:              {}", report.item_count)?;
    writeln!(out, "Categories:         {}", report.category_count)?;
    writeln!(out, "Total value:        {}", money(report.total_value))?;
    writeln!(out, "  Healthy stock:    {}", money(report.healthy_value))?;
    writeln!(out, "  Low stock:        {}", money(report.low_stock_value))?;
    writeln!(out, "  Out of stock:     {}", money(report.out_of_stock_value))?;

    if !report.by_category.is_empty() {
        writeln!(out)?;
        writeln!(out, "Value by category:")?;
        for entry in &report.by_category {
            writeln!(
                out,
                "  {:<20} {:>14} {:>6.1}%",
                fit(&entry.category, 20),
                money(entry.value),
                entry.share_percent
            )?;
        }
    }

    if !report.top_items.is_empty() {
        writeln!(out)?;
        writeln!(out, "Most valuable items:")?;
        for (rank, top) in report.top_items.iter().enumerate() {
            writeln!(
                out,
                "  {}. {:<20} {:>14}  {}",
                rank + 1,
                fit(&top.name, 20),
                money(top.value),
                top.status.label()
            )?;
        }
    }
    Ok(())
}

/// Accounts grouped by role, most privileged first.
pub fn users(out: &mut impl Write, directory: &UserDirectory) -> io::Result<()> {
    writeln!(out, "{:<16} {:<28} {}", "Username", "Full name", "Role")?;
    rule(out)?;
    for role in Role::ALL {
        for (username, account) in directory.users_by_role(role) {
            writeln!(
                out,
                "{:<16} {:<28} {}",
                fit(username, 16),
                fit(account.display_name(username), 28),
                account.role
            )?;
        }
    }
    writeln!(out, "{} user(s)", directory.len())
}

pub fn profile(out: &mut impl Write, principal: &Principal) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== My Profile ===")?;
    writeln!(out, "Username:  {}", principal.username)?;
    writeln!(out, "Full name: {}", principal.full_name)?;
    writeln!(out, "Role:      {}", principal.role)?;
    writeln!(out, "Permitted actions:")?;
    for permission in stockroom_auth::permissions_for(principal.role) {
        writeln!(out, "  - {permission}")?;
    }
    Ok(())
}
