//! Cart and account rendering.

use loza::{
    cart::{CartSnapshot, LineItem},
    customer::Customer,
    i18n::{Catalog, Locale, MessageId, format_price},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Variant title Shopify gives products without options.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Render a cart as a table with localized headings and prices.
pub(crate) fn render_cart(
    snapshot: Option<&CartSnapshot>,
    catalog: &Catalog,
    locale: Locale,
) -> String {
    let text = |id| catalog.get(locale, id);

    let Some(cart) = snapshot.filter(|cart| !cart.is_empty()) else {
        return format!(
            "{}\n{}",
            text(MessageId::CartEmpty),
            text(MessageId::CartEmptyDescription)
        );
    };

    let mut builder = Builder::default();

    builder.push_record([
        text(MessageId::Line),
        text(MessageId::Item),
        text(MessageId::Quantity),
        text(MessageId::UnitPrice),
        text(MessageId::LineTotal),
    ]);

    for line in &cart.lines {
        builder.push_record([
            line.line_id.to_string(),
            item_label(line),
            line.quantity.to_string(),
            format_price(&line.unit_price, locale),
            format_price(&line.line_total, locale),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..), Alignment::right());

    format!(
        "{} ({} {})\n{table}\n{}: {}\n{}: {}",
        text(MessageId::CartTitle),
        cart.total_quantity,
        text(MessageId::ItemsInCart),
        text(MessageId::Subtotal),
        format_price(&cart.subtotal, locale),
        text(MessageId::Total),
        format_price(&cart.total, locale),
    )
}

/// Message shown when checkout is attempted without accepting the terms.
pub(crate) fn terms_prompt(catalog: &Catalog, locale: Locale) -> String {
    let text = |id| catalog.get(locale, id);

    format!(
        "{}\n{} {} (--accept-terms)",
        text(MessageId::TermsRequired),
        text(MessageId::AgreeToTerms),
        text(MessageId::TermsAndConditions),
    )
}

/// One-line account status.
pub(crate) fn render_customer(customer: Option<&Customer>, catalog: &Catalog, locale: Locale) -> String {
    let text = |id| catalog.get(locale, id);

    match customer {
        Some(customer) => format!("{} {}", text(MessageId::SignedInAs), customer.display_name()),
        None => text(MessageId::SignedOut).to_string(),
    }
}

fn item_label(line: &LineItem) -> String {
    if line.title.is_empty() || line.title == DEFAULT_VARIANT_TITLE {
        return line.product_title.clone();
    }

    format!("{} ({})", line.product_title, line.title)
}

#[cfg(test)]
mod tests {
    use loza::{
        cart::{CartId, LineId, MerchandiseId, Price, Quantity},
        customer::CustomerId,
    };
    use testresult::TestResult;

    use super::*;

    fn cart() -> TestResult<CartSnapshot> {
        let unit_price = Price::parse("45.00", "ILS")?;
        let line_total = Price::parse("90.00", "ILS")?;

        Ok(CartSnapshot {
            cart_id: CartId::new("gid://shopify/Cart/c1")?,
            lines: vec![LineItem {
                line_id: LineId::new("gid://shopify/CartLine/1")?,
                merchandise_id: MerchandiseId::new("gid://shopify/ProductVariant/1")?,
                quantity: Quantity::new(2)?,
                unit_price,
                line_total,
                title: "750ml".to_string(),
                product_title: "Olive Oil".to_string(),
                product_handle: "olive-oil".to_string(),
            }],
            total_quantity: 2,
            subtotal: line_total,
            total: line_total,
            checkout_url: "https://loza.myshopify.com/cart/c/c1".to_string(),
        })
    }

    #[test]
    fn empty_cart_renders_empty_message() -> TestResult {
        let catalog = Catalog::load()?;

        let rendered = render_cart(None, &catalog, Locale::En);

        assert_eq!(
            rendered,
            "Your cart is empty\nAdd some products to get started"
        );

        Ok(())
    }

    #[test]
    fn cart_renders_lines_and_totals() -> TestResult {
        let catalog = Catalog::load()?;
        let cart = cart()?;

        let rendered = render_cart(Some(&cart), &catalog, Locale::En);

        assert!(rendered.starts_with("Shopping Cart (2 items)"), "{rendered}");
        assert!(rendered.contains("Olive Oil (750ml)"), "{rendered}");
        assert!(rendered.contains("gid://shopify/CartLine/1"), "{rendered}");
        assert!(rendered.contains("Subtotal: "), "{rendered}");

        Ok(())
    }

    #[test]
    fn headings_follow_locale() -> TestResult {
        let catalog = Catalog::load()?;
        let cart = cart()?;

        let rendered = render_cart(Some(&cart), &catalog, Locale::He);

        assert!(rendered.contains(catalog.get(Locale::He, MessageId::CartTitle)), "{rendered}");
        assert!(rendered.contains(catalog.get(Locale::He, MessageId::LineTotal)), "{rendered}");

        Ok(())
    }

    #[test]
    fn terms_prompt_names_the_flag() -> TestResult {
        let catalog = Catalog::load()?;

        assert_eq!(
            terms_prompt(&catalog, Locale::En),
            "Please accept the terms and conditions to proceed\n\
             I agree to the terms and conditions (--accept-terms)"
        );

        Ok(())
    }

    #[test]
    fn customer_status_names_the_customer() -> TestResult {
        let catalog = Catalog::load()?;
        let customer = Customer {
            id: CustomerId::new("gid://shopify/Customer/9")?,
            email: "noa@example.com".to_string(),
            first_name: Some("Noa".to_string()),
            last_name: None,
            phone: None,
            accepts_marketing: false,
        };

        assert_eq!(
            render_customer(Some(&customer), &catalog, Locale::En),
            "Signed in as Noa"
        );
        assert_eq!(
            render_customer(None, &catalog, Locale::En),
            "You are not signed in"
        );

        Ok(())
    }

    #[test]
    fn default_variant_title_is_hidden() -> TestResult {
        let mut line = cart()?.lines.remove(0);
        line.title = DEFAULT_VARIANT_TITLE.to_string();

        assert_eq!(item_label(&line), "Olive Oil");

        Ok(())
    }
}
