//! Single-page PDF holding one bitmap.
//!
//! Sizes follow a pixel-unit page: the page is `bitmap / scale` logical
//! pixels, each 0.75pt. The bitmap is drawn at that size from the top-left
//! corner.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::{ExportOptions, PageOrientation};
use crate::error::Result;

/// Points per CSS pixel.
pub const PX_TO_PT: f32 = 0.75;

/// Page size in points, `(width, height)`.
pub fn page_size(bitmap_width: u32, bitmap_height: u32, options: &ExportOptions) -> (f32, f32) {
    let w = bitmap_width as f32 / options.scale * PX_TO_PT;
    let h = bitmap_height as f32 / options.scale * PX_TO_PT;
    match options.orientation {
        PageOrientation::Landscape => (w.max(h), w.min(h)),
        PageOrientation::Portrait => (w.min(h), w.max(h)),
    }
}

/// Build the PDF bytes for a bitmap.
pub fn build_pdf(bitmap: &RgbaImage, title: &str, options: &ExportOptions) -> Result<Vec<u8>> {
    let (page_w, page_h) = page_size(bitmap.width(), bitmap.height(), options);
    let image_w = bitmap.width() as f32 / options.scale * PX_TO_PT;
    let image_h = bitmap.height() as f32 / options.scale * PX_TO_PT;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let rgb: Vec<u8> = bitmap.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&rgb)?;
    let compressed = encoder.finish()?;

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width() as i64,
            "Height" => bitmap.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "FlateDecode",
        },
        compressed,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    image_w.into(),
                    0_i64.into(),
                    0_i64.into(),
                    image_h.into(),
                    0_i64.into(),
                    (page_h - image_h).into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0_i64.into(), 0_i64.into(), page_w.into(), page_h.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if options.include_metadata {
        let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("vizblock ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
