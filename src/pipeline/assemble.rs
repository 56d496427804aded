//! Markdown assembly: OCR pages → one output document.
//!
//! Pages are joined in service order with a horizontal rule, the same
//! visual break a human would place between scanned pages. When image
//! embedding is enabled, each page's `![id](id)` placeholders — the
//! service's way of referencing assets it extracted from that page — are
//! rewritten into self-contained `data:` URLs so the output Markdown needs
//! no sidecar files.

use crate::engine::{OcrDocument, OcrPage};

/// Separator between consecutive pages in the assembled output.
const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Assemble the final Markdown from an OCR result.
///
/// With `embed_images = false` the result is the page texts joined in page
/// order and nothing else — no image data ever appears.
pub fn assemble_markdown(doc: &OcrDocument, embed_images: bool) -> String {
    let parts: Vec<String> = doc
        .pages
        .iter()
        .map(|page| {
            if embed_images && !page.images.is_empty() {
                embed_page_images(page)
            } else {
                page.markdown.clone()
            }
        })
        .collect();

    parts.join(PAGE_SEPARATOR)
}

/// Rewrite one page's image placeholders into inline `data:` URLs.
///
/// An asset with no payload (the service omits `image_base64` when it was
/// not requested) is left untouched. An asset whose placeholder does not
/// appear in the page text is appended after it, so extracted images are
/// never silently dropped and stay within their page's segment.
fn embed_page_images(page: &OcrPage) -> String {
    let mut markdown = page.markdown.clone();

    for image in &page.images {
        let Some(payload) = image.image_base64.as_deref() else {
            continue;
        };
        // Newer service versions return a complete data URL in the payload
        // field; older ones return the bare base64 string.
        let data_url = if payload.starts_with("data:") {
            payload.to_string()
        } else {
            format!("data:image/png;base64,{payload}")
        };

        let placeholder = format!("![{id}]({id})", id = image.id);
        let replacement = format!("![{}]({})", image.id, data_url);

        if markdown.contains(&placeholder) {
            markdown = markdown.replace(&placeholder, &replacement);
        } else {
            markdown.push_str("\n\n");
            markdown.push_str(&replacement);
        }
    }

    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OcrImageAsset;

    fn page(index: usize, markdown: &str, images: Vec<OcrImageAsset>) -> OcrPage {
        OcrPage {
            index,
            markdown: markdown.to_string(),
            images,
        }
    }

    fn asset(id: &str, payload: Option<&str>) -> OcrImageAsset {
        OcrImageAsset {
            id: id.to_string(),
            image_base64: payload.map(String::from),
        }
    }

    #[test]
    fn pages_join_with_horizontal_rule() {
        let doc = OcrDocument {
            pages: vec![page(0, "first", vec![]), page(1, "second", vec![])],
            model: None,
        };
        assert_eq!(assemble_markdown(&doc, false), "first\n\n---\n\nsecond");
    }

    #[test]
    fn placeholder_is_rewritten_to_data_url() {
        let doc = OcrDocument {
            pages: vec![page(
                0,
                "Intro\n\n![img-0.jpeg](img-0.jpeg)\n\nOutro",
                vec![asset("img-0.jpeg", Some("QUJD"))],
            )],
            model: None,
        };
        let md = assemble_markdown(&doc, true);
        assert!(md.contains("![img-0.jpeg](data:image/png;base64,QUJD)"));
        assert!(!md.contains("![img-0.jpeg](img-0.jpeg)"));
    }

    #[test]
    fn full_data_url_payload_is_not_double_prefixed() {
        let doc = OcrDocument {
            pages: vec![page(
                0,
                "![i](i)",
                vec![asset("i", Some("data:image/jpeg;base64,QUJD"))],
            )],
            model: None,
        };
        let md = assemble_markdown(&doc, true);
        assert!(md.contains("![i](data:image/jpeg;base64,QUJD)"));
        assert!(!md.contains("data:image/png;base64,data:"));
    }

    #[test]
    fn embedded_image_stays_within_its_page_segment() {
        let doc = OcrDocument {
            pages: vec![
                page(0, "page one text", vec![asset("fig", Some("QUJD"))]),
                page(1, "page two text", vec![]),
            ],
            model: None,
        };
        let md = assemble_markdown(&doc, true);
        let image_pos = md.find("data:image").expect("image embedded");
        let page1_pos = md.find("page one text").unwrap();
        let page2_pos = md.find("page two text").unwrap();
        assert!(image_pos > page1_pos, "image must come after its page's text");
        assert!(image_pos < page2_pos, "image must come before the next page");
    }

    #[test]
    fn disabled_embedding_emits_no_image_data() {
        let doc = OcrDocument {
            pages: vec![page(
                0,
                "text ![img-0.jpeg](img-0.jpeg)",
                vec![asset("img-0.jpeg", Some("QUJD"))],
            )],
            model: None,
        };
        let md = assemble_markdown(&doc, false);
        assert!(!md.contains("data:image"));
        assert!(md.contains("![img-0.jpeg](img-0.jpeg)"), "placeholder untouched");
    }

    #[test]
    fn asset_without_payload_is_skipped() {
        let doc = OcrDocument {
            pages: vec![page(0, "![a](a)", vec![asset("a", None)])],
            model: None,
        };
        let md = assemble_markdown(&doc, true);
        assert_eq!(md, "![a](a)");
    }
}
