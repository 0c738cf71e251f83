//! Cart commands.

use anyhow::Result;
use gomarket_cart::cart::NewCartItem;
use gomarket_cart::{CartStore, PendingWrite, ProductId};

use super::{AddArgs, QuantityArgs};
use crate::context::Context;
use crate::output::{format_price, quantity_badge};

const COLUMN_WIDTHS: [usize; 4] = [16, 32, 10, 5];

/// List the cart lines.
pub async fn list(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let products = cart.products()?;
    cart.close().await?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("Cart is empty.");
        ctx.output.info("Run `gomarket add` to put something in it.");
        return Ok(());
    }

    ctx.output.header("Cart");
    ctx.output
        .table_row(&["ID", "TITLE", "PRICE", "QTY"], &COLUMN_WIDTHS);
    for item in &products {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &item.title,
                &format_price(item.price),
                &quantity_badge(item.quantity, COLUMN_WIDTHS[3]),
            ],
            &COLUMN_WIDTHS,
        );
    }

    let units: u64 = products.iter().map(|i| u64::from(i.quantity)).sum();
    ctx.output
        .info(&format!("{} lines, {} units", products.len(), units));
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let item = NewCartItem::new(args.id, args.title, args.image_url, args.price);
    let id = item.id.clone();

    let pending = cart.add_to_cart(item)?;
    finish(ctx, &cart, &id, pending).await
}

/// Raise a product's quantity.
pub async fn increment(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    let pending = cart.increment(&id)?;
    finish(ctx, &cart, &id, pending).await
}

/// Lower a product's quantity.
pub async fn decrement(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    let pending = cart.decrement(&id)?;
    finish(ctx, &cart, &id, pending).await
}

/// Wait for the write, close the cart and report the line's state.
async fn finish(
    ctx: &Context,
    cart: &CartStore,
    id: &ProductId,
    pending: PendingWrite,
) -> Result<()> {
    let changed = pending.is_queued();
    let line = cart.item(id)?;
    let persisted = pending.persisted().await;
    cart.close().await?;
    persisted?;

    if ctx.output.is_json() {
        ctx.output.json(&line);
        return Ok(());
    }

    match line {
        Some(item) if changed => ctx.output.success(&format!(
            "{} ({}) quantity is now {}",
            item.title,
            item.id,
            quantity_badge(item.quantity, 0)
        )),
        _ => ctx.output.warn(&format!("{} is not in the cart", id)),
    }
    Ok(())
}
