use blocks_wasm::carousel::decorate;
use blocks_wasm::models::{CarouselConfig, DecorateOptions, DisplayMode, Element, VariantTag};
use blocks_wasm::parse::{parse_block, Detector};
use blocks_wasm::renderers::{decorate_markup, DecorateError, RenderedCarousel};

/// A slide row: picture, copy with a button, style and CTA keywords
fn image_row(n: usize, style: &str, cta: &str) -> String {
    format!(
        r#"<div><div><picture><img src="/media_{n}.png" alt="Slide {n}"/></picture></div><div><h3>Title {n}</h3><p>Copy {n}</p><p class="button-container"><a href="/products/{n}" class="button">Shop</a></p></div><div><p>{style}</p></div><div><p>{cta}</p></div></div>"#
    )
}

fn text_row(text: &str) -> String {
    format!("<div><div><p>{}</p></div></div>", text)
}

fn block(rows: &[String]) -> String {
    format!(r#"<div class="carousel block">{}</div>"#, rows.concat())
}

fn render(block_xhtml: &str, sibling: Option<&str>) -> RenderedCarousel {
    decorate_markup(block_xhtml, sibling, false, &DecorateOptions::default()).unwrap()
}

fn slides(rendered: &RenderedCarousel) -> Vec<&Element> {
    rendered.container.find_all(&|el| el.is("li"))
}

fn slides_list(rendered: &RenderedCarousel) -> &Element {
    rendered.container.find_first(&|el| el.is("ul")).unwrap()
}

/// Six authored rows: four image slides and two text rows
#[test]
fn test_four_slides_and_side_content() {
    let rows = vec![
        image_row(1, "highlight", "cta-button-secondary"),
        image_row(2, "highlight", "cta-button-secondary"),
        image_row(3, "highlight", "cta-button-secondary"),
        image_row(4, "highlight", "cta-button-secondary"),
        text_row("Discover the collection"),
        text_row("Crafted since 1984"),
    ];
    let rendered = render(&block(&rows), None);

    let slides = slides(&rendered);
    assert_eq!(slides.len(), 4);
    for slide in &slides {
        assert!(slide.has_class("carousel-slide"));
        assert!(slide.has_class("highlight"));
        let buttons = slide.find_all(&|el| el.has_class("button-container"));
        assert_eq!(buttons.len(), 1);
        assert!(buttons[0].has_class("cta-button-secondary"));
        assert!(!buttons[0].has_class("default"));
    }

    let left = rendered.left_content.as_ref().expect("side content");
    assert!(left.has_class("default-content-wrapper"));
    let texts: Vec<String> = left.child_elements().map(|el| el.text_content()).collect();
    assert_eq!(texts, vec!["Discover the collection", "Crafted since 1984"]);
}

#[test]
fn test_slide_order_follows_row_order() {
    let rows = vec![
        text_row("Intro"),
        image_row(7, "default", "default"),
        // media row with too few columns is dropped, not moved aside
        r#"<div><div><picture><img src="/stray.png" alt=""/></picture></div></div>"#.to_string(),
        image_row(3, "default", "default"),
        text_row("Outro"),
        image_row(5, "default", "default"),
    ];
    let decorated = decorate(parse_block(&block(&rows)).unwrap(), &CarouselConfig::default());

    let sources: Vec<String> = decorated
        .slides
        .iter()
        .map(|s| match &s.media {
            Some(blocks_wasm::models::MediaRef::Image(img)) => img.src.clone(),
            other => panic!("unexpected media {:?}", other),
        })
        .collect();
    assert_eq!(sources, vec!["/media_7.png", "/media_3.png", "/media_5.png"]);
    assert_eq!(decorated.dropped.len(), 1);
    assert_eq!(decorated.left_content.len(), 2);
}

#[test]
fn test_first_slide_is_active_and_indexed() {
    let rows = vec![image_row(1, "default", "default"), image_row(2, "default", "default")];
    let rendered = render(&block(&rows), None);
    let slides = slides(&rendered);
    assert!(slides[0].has_class("active-slide"));
    assert!(!slides[1].has_class("active-slide"));
    assert_eq!(slides[1].attr("data-slide-index"), Some("1"));
    // default style adds no class
    assert_eq!(slides[1].attr("class"), Some("carousel-slide"));
}

#[test]
fn test_variant_from_sibling_block() {
    let sibling = r#"<div class="default-content-wrapper"><p>single-slide-carousel</p></div>"#;
    let rows = vec![image_row(1, "default", "default"), image_row(2, "default", "default")];
    let rendered = render(&block(&rows), Some(sibling));

    let variant = rendered.decorated.variant;
    assert_eq!(variant.tag, VariantTag::SingleSlide);
    assert_eq!(variant.source, Some(Detector::SiblingBlock));
    assert_eq!(variant.sibling.paragraph_index, Some(0));
    assert!(variant.sibling.remove_wrapper);
    assert_eq!(slides(&rendered).len(), 2);
    assert_eq!(rendered.decorated.mode, DisplayMode::SingleActive);

    let list = slides_list(&rendered);
    assert!(list.has_class("single-slide-carousel"));
    assert_eq!(list.attr("style"), Some("--items-per-view: 1"));
}

#[test]
fn test_variant_from_first_row() {
    let rows = vec![
        text_row("multislide-carousel"),
        image_row(1, "default", "default"),
        image_row(2, "default", "default"),
        image_row(3, "default", "default"),
    ];
    let rendered = render(&block(&rows), None);

    assert_eq!(rendered.decorated.variant_tag(), VariantTag::MultiSlide);
    assert_eq!(rendered.decorated.variant.source, Some(Detector::FirstRow));
    assert_eq!(slides(&rendered).len(), 3);
    assert!(rendered.left_content.is_none());
    assert!(!rendered.container_html().contains(">multislide-carousel<"));
    assert_eq!(slides_list(&rendered).attr("style"), Some("--items-per-view: 5"));
}

#[test]
fn test_variant_from_property_element() {
    let rows = vec![
        image_row(1, "default", "default"),
        r#"<div><div><p data-aue-prop="carouselVariant">single-slide-carousel</p></div></div>"#.to_string(),
        image_row(2, "default", "default"),
    ];
    let rendered = render(&block(&rows), None);

    assert_eq!(rendered.decorated.variant_tag(), VariantTag::SingleSlide);
    assert_eq!(rendered.decorated.variant.source, Some(Detector::PropertyElement));
    assert_eq!(slides(&rendered).len(), 2);
    assert!(rendered.left_content.is_none());
    assert!(!rendered.container_html().contains("carouselVariant"));
}

#[test]
fn test_sibling_wins_and_later_declarations_are_consumed() {
    let sibling = r#"<div class="default-content-wrapper"><h2>Heading</h2><p>multislide-carousel</p></div>"#;
    let rows = vec![
        text_row("single-slide-carousel"),
        image_row(1, "default", "default"),
        image_row(2, "default", "default"),
    ];
    let rendered = render(&block(&rows), Some(sibling));

    assert_eq!(rendered.decorated.variant_tag(), VariantTag::MultiSlide);
    assert_eq!(rendered.decorated.variant.source, Some(Detector::SiblingBlock));
    // the wrapper still holds its heading
    assert!(!rendered.decorated.variant.sibling.remove_wrapper);
    assert_eq!(slides(&rendered).len(), 2);
    assert!(rendered.left_content.is_none());
}

#[test]
fn test_no_variant_defaults_to_windowed() {
    let rows = vec![image_row(1, "default", "default")];
    let rendered = render(&block(&rows), None);
    assert_eq!(rendered.decorated.variant_tag(), VariantTag::Unset);
    assert_eq!(rendered.decorated.mode, DisplayMode::Windowed { slides_to_show: 4 });
    assert_eq!(slides_list(&rendered).attr("style"), Some("--items-per-view: 2"));

    let wide = decorate_markup(&block(&rows), None, true, &DecorateOptions::default()).unwrap();
    assert_eq!(wide.decorated.mode, DisplayMode::Windowed { slides_to_show: 5 });
}

#[test]
fn test_block_class_declares_variant() {
    let xhtml = format!(
        r#"<div class="carousel single-slide-carousel block">{}</div>"#,
        image_row(1, "default", "default")
    );
    let rendered = render(&xhtml, None);
    assert_eq!(rendered.decorated.variant.source, Some(Detector::BlockClass));
    assert_eq!(rendered.decorated.mode, DisplayMode::SingleActive);
}

#[test]
fn test_video_slide_markup() {
    let row = r#"<div><div><a href="https://cdn.example.com/reel/master.m3u8">Reel</a></div><div><p>Night shift</p><p>Luminous hands for low light.</p></div><div><p>default</p></div><div><p>default</p></div></div>"#;
    let rendered = render(&block(&[row.to_string()]), None);
    let html = rendered.container_html();

    assert!(html.contains(r#"data-hls-src="https://cdn.example.com/reel/master.m3u8""#));
    assert!(html.contains(r#"preload="none""#));
    assert!(html.contains("progress-bar-container"));
    assert!(html.contains("<h4>Night shift</h4>"));
    assert!(html.contains(r#"<p class="clamp-text">Luminous hands for low light.</p><div class="show-more-container">"#));
}

#[test]
fn test_responsive_picture_with_alternate_image() {
    let row = r#"<div><div><picture><img src="/desk.jpg" alt="Dial"/></picture></div><div><p>Copy</p></div><div><p>default</p></div><div><p>default</p></div><div><picture><img src="/mob.jpg" alt=""/></picture></div></div>"#;
    let rendered = render(&block(&[row.to_string()]), None);
    let picture = rendered.container.find_first(&|el| el.is("picture")).unwrap();
    let first = picture.child_elements().next().unwrap();
    assert_eq!(first.attr("media"), Some("(max-width: 767px)"));
    assert!(first.attr("srcset").unwrap().starts_with("/mob.jpg"));
    let img = picture.children_by_tag("img").next().unwrap();
    assert!(img.attr("src").unwrap().starts_with("/desk.jpg?width=750"));
    assert_eq!(img.attr("alt"), Some("Dial"));
}

#[test]
fn test_nav_buttons_and_placeholders() {
    let options: DecorateOptions =
        serde_json::from_str(r#"{"placeholders": {"previousSlide": "Précédent", "nextSlide": "Suivant"}}"#).unwrap();
    let rendered = decorate_markup(&block(&[image_row(1, "default", "default")]), None, false, &options).unwrap();
    let html = rendered.container_html();
    assert!(html.contains(r#"<div class="carousel-nav-buttons">"#));
    assert!(html.contains(r#"aria-label="Précédent""#));
    assert!(html.contains(r#"aria-label="Suivant""#));
}

#[test]
fn test_malformed_markup_is_an_error() {
    let err = decorate_markup("<div><div>", None, false, &DecorateOptions::default()).unwrap_err();
    assert!(matches!(err, DecorateError::Markup(_)));
}

#[test]
fn test_zero_min_columns_keeps_loose_rows_aside() {
    let options: DecorateOptions = serde_json::from_str(r#"{"config": {"minColumns": 0}}"#).unwrap();
    let xhtml = r#"<div class="carousel"><div><p>loose text row</p></div></div>"#;
    let rendered = decorate_markup(xhtml, None, false, &options).unwrap();
    assert_eq!(rendered.decorated.slide_count(), 0);
    let left = rendered.left_content.as_ref().expect("side content");
    assert_eq!(left.text_content().trim(), "loose text row");
}

#[test]
fn test_side_panel_keeps_row_instrumentation() {
    let rows = vec![
        r#"<div data-aue-resource="urn:aemconnection:/content/intro" data-aue-type="component"><div><p>Intro</p></div></div>"#.to_string(),
        image_row(1, "default", "default"),
    ];
    let rendered = render(&block(&rows), None);
    let left = rendered.left_content.as_ref().expect("side content");
    assert_eq!(left.attr("data-aue-resource"), Some("urn:aemconnection:/content/intro"));
    assert_eq!(left.attr("data-aue-type"), Some("component"));
    assert_eq!(left.attr("class"), Some("default-content-wrapper"));
}
