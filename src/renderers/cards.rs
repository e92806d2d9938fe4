//! Card grid
//!
//! Every authored row becomes one `li`. Columns keep their position: image,
//! body, then the style, CTA and small-viewport image columns, which stay in
//! the card but are hidden.

use super::carousel::{restyle_buttons, DecorateError};
use super::picture::{responsive_picture, EdsImageOptimizer, ImageOptimizer};
use crate::models::{AuthoredBlock, AuthoredRow, CarouselConfig, DecorateOptions, Element, ImageRef, Node, DEFAULT_TAG};
use crate::parse::{extract_image, keyword, parse_block};

pub const CARD_IMAGE_CLASS: &str = "cards-card-image";
pub const CARD_BODY_CLASS: &str = "cards-card-body";
pub const CARD_CONFIG_CLASS: &str = "cards-config";

fn column_class(index: usize) -> &'static str {
    match index {
        0 => CARD_IMAGE_CLASS,
        2..=4 => CARD_CONFIG_CLASS,
        _ => CARD_BODY_CLASS,
    }
}

/// Swap every `picture > img` under `el` for an optimized picture
fn replace_pictures(el: &mut Element, picture_for: &dyn Fn(&ImageRef) -> Element) {
    for child in el.children.iter_mut() {
        let Node::Element(child) = child else {
            continue;
        };
        if child.is("picture") {
            let replacement = child.children_by_tag("img").next().and_then(|img| {
                let image = extract_image(img)?;
                let mut picture = picture_for(&image);
                carry_instrumentation(img, &mut picture);
                Some(picture)
            });
            if let Some(picture) = replacement {
                *child = picture;
                continue;
            }
        }
        replace_pictures(child, picture_for);
    }
}

/// `data-*` attributes of the authored image move to the new fallback `img`
fn carry_instrumentation(from: &Element, picture: &mut Element) {
    let Some(img) = picture
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|el| el.is("img"))
    else {
        return;
    };
    for (name, value) in from.attrs.iter().filter(|(name, _)| name.starts_with("data-")) {
        img.set_attr(name, value.as_str());
    }
}

/// One `li` per authored row
pub fn render_card(row: &AuthoredRow, config: &CarouselConfig, optimizer: &dyn ImageOptimizer) -> Element {
    let columns: Vec<&Element> = row.element.child_elements().collect();
    let style = columns.get(2).map(|col| keyword(col)).unwrap_or_else(|| DEFAULT_TAG.to_string());
    let cta = columns.get(3).map(|col| keyword(col)).unwrap_or_else(|| DEFAULT_TAG.to_string());
    let alternate = columns.get(4).and_then(|col| extract_image(col));

    let mut li = Element::new("li");
    if style != DEFAULT_TAG {
        for class in style.split_whitespace() {
            li.add_class(class);
        }
    }
    for (name, value) in row.element.attrs.iter().filter(|(name, _)| name != "class") {
        li.set_attr(name, value.as_str());
    }

    let standard = |image: &ImageRef| optimizer.optimized_picture(image, false, &config.image_breakpoints);
    for (index, column) in columns.into_iter().enumerate() {
        let mut column = column.clone();
        column.set_attr("class", column_class(index));
        if column_class(index) == CARD_CONFIG_CLASS {
            column.set_attr("style", "display: none");
        }
        match (index, &alternate) {
            (0, Some(alternate)) => {
                let merged = |image: &ImageRef| {
                    responsive_picture(
                        optimizer,
                        image,
                        alternate,
                        &config.image_breakpoints,
                        config.mobile_max_width,
                        config.desktop_min_width,
                    )
                };
                replace_pictures(&mut column, &merged);
            }
            _ => replace_pictures(&mut column, &standard),
        }
        li.children.push(column.into());
    }

    restyle_buttons(&mut li, &cta, &config.cta_classes);
    li
}

pub fn render_cards(block: &AuthoredBlock, config: &CarouselConfig, optimizer: &dyn ImageOptimizer) -> Element {
    let mut ul = Element::new("ul");
    for row in &block.rows {
        ul.children.push(render_card(row, config, optimizer).into());
    }
    log::debug!("rendered {} cards", block.rows.len());
    ul
}

/// Markup in, markup out: the `ul` that replaces the block content
pub fn decorate_cards_markup(block_xhtml: &str, options: &DecorateOptions) -> Result<Element, DecorateError> {
    let block = parse_block(block_xhtml)?;
    let optimizer = EdsImageOptimizer::new(options.page_url.as_deref());
    Ok(render_cards(&block, &options.config, &optimizer))
}
