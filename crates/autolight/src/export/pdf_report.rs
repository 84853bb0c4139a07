use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::table::ExportTable;
use crate::error::ExportError;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_LEFT: f32 = 40.0;
const TOP: f32 = 742.0;
const BOTTOM: f32 = 50.0;
const LINE_HEIGHT: f32 = 14.0;
/// Left edge of each column, in points.
const COLUMN_X: [f32; 7] = [40.0, 100.0, 190.0, 290.0, 390.0, 450.0, 520.0];
/// Characters kept per column before truncation.
const COLUMN_CHARS: [usize; 7] = [10, 16, 18, 18, 8, 11, 12];

/// Renders the table as a paginated PDF. The title and info lines open the
/// first page; every page repeats the header row.
pub fn render(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let _span = tracing::info_span!("export.pdf", rows = table.rows.len()).entered();

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
            "F2" => bold_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for content in layout_pages(table) {
        let stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(Object::Stream(stream));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<_>>(),
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::PdfRendering(e.to_string()))?;

    log::debug!("Rendered PDF report ({} pages, {} bytes)", page_count, buffer.len());
    Ok(buffer)
}

/// Splits the table into one content stream per page.
fn layout_pages(table: &ExportTable) -> Vec<String> {
    let mut pages = Vec::new();
    let mut page = PageWriter::new();

    page.text(MARGIN_LEFT, 16.0, true, &table.title);
    page.advance(LINE_HEIGHT);
    for (label, value) in &table.info {
        page.text(MARGIN_LEFT, 10.0, false, &format!("{}: {}", label, value));
    }
    page.advance(LINE_HEIGHT / 2.0);
    page.header();

    let last = table.rows.len().saturating_sub(1);
    for (i, row) in table.rows.iter().enumerate() {
        if page.y < BOTTOM {
            pages.push(page.finish());
            page = PageWriter::new();
            page.header();
        }
        page.row(row, i == last);
    }

    pages.push(page.finish());
    pages
}

struct PageWriter {
    content: String,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            content: String::from("BT\n"),
            y: TOP,
        }
    }

    fn text(&mut self, x: f32, size: f32, bold: bool, text: &str) {
        let font = if bold { "F2" } else { "F1" };
        self.content.push_str(&format!(
            "/{} {} Tf\n1 0 0 1 {:.1} {:.1} Tm\n({}) Tj\n",
            font,
            size,
            x,
            self.y,
            escape_pdf_string(text)
        ));
        self.y -= LINE_HEIGHT.max(size + 4.0);
    }

    fn cells(&mut self, cells: &[&str], bold: bool) {
        let font = if bold { "F2" } else { "F1" };
        self.content.push_str(&format!("/{} 9 Tf\n", font));
        for (i, cell) in cells.iter().enumerate() {
            let clipped: String = cell.chars().take(COLUMN_CHARS[i]).collect();
            self.content.push_str(&format!(
                "1 0 0 1 {:.1} {:.1} Tm\n({}) Tj\n",
                COLUMN_X[i],
                self.y,
                escape_pdf_string(&clipped)
            ));
        }
        self.y -= LINE_HEIGHT;
    }

    fn header(&mut self) {
        self.cells(&super::table::COLUMNS, true);
    }

    fn row(&mut self, row: &[String; 7], bold: bool) {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        self.cells(&cells, bold);
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    fn finish(mut self) -> String {
        self.content.push_str("ET\n");
        self.content
    }
}

fn escape_pdf_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '\\' => "\\\\".to_string(),
            c if c.is_ascii() && !c.is_control() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}
