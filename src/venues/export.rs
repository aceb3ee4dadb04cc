use super::{Venue, VenueRepository as _};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::users::User;
use anyhow::{Context as _, Result};
use itertools::Itertools as _;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rocket::get;
use rocket::http::{ContentType, Header};
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use std::io::Cursor;

pub(crate) const CSV_HEADER: [&str; 6] = [
    "Venue Name",
    "Address",
    "Zip Code",
    "Phone",
    "Web Address",
    "Email",
];

#[get("/venues/export/csv")]
pub(crate) async fn venue_csv(
    _user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Attachment> {
    let venues = repository.all_venues().await?;
    Ok(Attachment {
        content_type: ContentType::CSV,
        file_name: "venues.csv",
        body: venues_csv(&venues)?,
    })
}

#[get("/venues/export/text")]
pub(crate) async fn venue_text(
    _user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Attachment> {
    let venues = repository.all_venues().await?;
    Ok(Attachment {
        content_type: ContentType::Plain,
        file_name: "venues.txt",
        body: venues_text(&venues).into_bytes(),
    })
}

#[get("/venues/export/pdf")]
pub(crate) async fn venue_pdf(
    _user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Attachment> {
    let venues = repository.all_venues().await?;
    Ok(Attachment {
        content_type: ContentType::PDF,
        file_name: "venue.pdf",
        body: venues_pdf(&venues)?,
    })
}

/// A downloadable file.
#[derive(Debug)]
pub(crate) struct Attachment {
    content_type: ContentType,
    file_name: &'static str,
    body: Vec<u8>,
}

impl<'r> Responder<'r, 'static> for Attachment {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(self.content_type)
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename={}", self.file_name),
            ))
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

/// One header row followed by one row per venue.
pub(crate) fn venues_csv(venues: &[Venue]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for venue in venues {
        writer.write_record(venue.export_fields())?;
    }
    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("failed to finish CSV export")
}

/// Six lines per venue followed by two blank lines.
pub(crate) fn venues_text(venues: &[Venue]) -> String {
    venues
        .iter()
        .map(|venue| format!("{}\n\n\n", venue.export_fields().iter().join("\n")))
        .collect()
}

const PAGE_WIDTH: Mm = Mm(215.9);
const PAGE_HEIGHT: Mm = Mm(279.4);
const MARGIN: Mm = Mm(25.4);
const FONT_SIZE: f32 = 14.0;
/// Leading in points, 1.2 times the font size.
const LINE_HEIGHT: f32 = FONT_SIZE * 1.2;
const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// The lines of the PDF export: one per field, a blank line after each venue.
fn pdf_lines(venues: &[Venue]) -> Vec<&str> {
    venues
        .iter()
        .flat_map(|venue| venue.export_fields().into_iter().chain([""]))
        .collect()
}

/// How many baselines fit between the top and the bottom margin.
fn lines_per_page() -> usize {
    let usable_height = (PAGE_HEIGHT.0 - 2.0 * MARGIN.0) * POINTS_PER_MM;
    (usable_height / LINE_HEIGHT).floor() as usize + 1
}

/// The lines of each page. There is always at least one, possibly empty, page.
fn pdf_pages<'a, 'v>(lines: &'a [&'v str]) -> Vec<&'a [&'v str]> {
    let mut pages: Vec<_> = lines.chunks(lines_per_page()).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }
    pages
}

/// US Letter, Helvetica 14pt, flowing from the top margin
/// and continuing on a new page at the bottom margin.
pub(crate) fn venues_pdf(venues: &[Venue]) -> Result<Vec<u8>> {
    let lines = pdf_lines(venues);
    let (document, first_page, first_layer) =
        PdfDocument::new("Venues", PAGE_WIDTH, PAGE_HEIGHT, "Venues");
    let font = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("failed to load Helvetica")?;

    let mut layer = document.get_page(first_page).get_layer(first_layer);
    for (index, page_lines) in pdf_pages(&lines).into_iter().enumerate() {
        if index > 0 {
            let (page, page_layer) = document.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Venues");
            layer = document.get_page(page).get_layer(page_layer);
        }
        layer.begin_text_section();
        layer.set_font(&font, FONT_SIZE);
        layer.set_line_height(LINE_HEIGHT);
        layer.set_text_cursor(MARGIN, Mm(PAGE_HEIGHT.0 - MARGIN.0));
        for line in page_lines {
            layer.write_text(*line, &font);
            layer.add_line_break();
        }
        layer.end_text_section();
    }

    document
        .save_to_bytes()
        .context("failed to render PDF export")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_user_with_password, add_venue, client, client_repository, login_cookie};
    use crate::users::UserId;
    use crate::venues::VenueId;
    use rocket::http::Status;

    fn venue(id: i64, name: &str, address: &str) -> Venue {
        Venue {
            id: VenueId(id),
            name: name.to_owned(),
            address: address.to_owned(),
            zip_code: "12345".to_owned(),
            phone: "555-0100".to_owned(),
            web: "https://example.com".to_owned(),
            email_address: "info@example.com".to_owned(),
            owner_id: UserId(1),
            image: None,
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_venue() {
        let venues = [
            venue(1, "Town Hall", "1 Main Street"),
            venue(2, "Park", "Lakeside, North"),
            venue(3, "Museum", "3 Art Lane"),
        ];
        let csv = String::from_utf8(venues_csv(&venues).unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(4, lines.len());
        assert_eq!("Venue Name,Address,Zip Code,Phone,Web Address,Email", lines[0]);
        assert_eq!(
            "Town Hall,1 Main Street,12345,555-0100,https://example.com,info@example.com",
            lines[1]
        );
        assert_eq!(
            "Park,\"Lakeside, North\",12345,555-0100,https://example.com,info@example.com",
            lines[2]
        );
    }

    #[test]
    fn csv_of_no_venues_is_just_the_header() {
        let csv = String::from_utf8(venues_csv(&[]).unwrap()).unwrap();
        assert_eq!(1, csv.lines().count());
    }

    #[test]
    fn text_has_six_lines_and_two_blank_lines_per_venue() {
        let text = venues_text(&[venue(1, "Town Hall", "1 Main Street")]);
        assert_eq!(
            "Town Hall\n1 Main Street\n12345\n555-0100\nhttps://example.com\ninfo@example.com\n\n\n",
            text
        );
    }

    #[test]
    fn text_concatenates_venues_in_order() {
        let text = venues_text(&[venue(1, "A", "a"), venue(2, "B", "b")]);
        assert!(text.starts_with("A\n"));
        assert!(text.contains("\n\n\nB\n"));
    }

    #[test]
    fn pdf_lines_separate_venues_with_a_blank_line() {
        let venues = [venue(1, "A", "a"), venue(2, "B", "b")];
        let lines = pdf_lines(&venues);
        assert_eq!(14, lines.len());
        assert_eq!("A", lines[0]);
        assert_eq!("", lines[6]);
        assert_eq!("B", lines[7]);
    }

    #[test]
    fn a_letter_page_holds_thirty_nine_lines() {
        assert_eq!(39, lines_per_page());
    }

    #[test]
    fn overflowing_lines_start_a_new_page() {
        let lines = vec!["line"; 40];
        let pages = pdf_pages(&lines);
        assert_eq!(2, pages.len());
        assert_eq!(39, pages[0].len());
        assert_eq!(["line"], pages[1]);
        assert_eq!(1, pdf_pages(&lines[..39]).len());
    }

    #[test]
    fn twelve_venues_fill_three_pages() {
        let venues: Vec<_> = (1..=12).map(|i| venue(i, "Hall", "Street")).collect();
        let lines = pdf_lines(&venues);
        assert_eq!(7 * 12, lines.len());
        assert_eq!(3, pdf_pages(&lines).len());
    }

    #[test]
    fn no_venues_still_make_one_empty_page() {
        let pages = pdf_pages(&[]);
        assert_eq!(1, pages.len());
        assert!(pages[0].is_empty());
    }

    #[test]
    fn pdf_export_is_a_pdf_document() {
        let venues: Vec<_> = (1..=12).map(|i| venue(i, "Hall", "Street")).collect();
        let pdf = venues_pdf(&venues).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_export_of_no_venues_is_still_a_document() {
        assert!(venues_pdf(&[]).unwrap().starts_with(b"%PDF"));
    }

    #[rocket::async_test]
    async fn csv_download_is_an_attachment() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let ada = add_user_with_password(&mut repository, "ada", "analytical").await;
        add_venue(&mut repository, ada.id, "Town Hall").await;

        let response = client
            .get("/venues/export/csv")
            .private_cookie(login_cookie(&ada))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(ContentType::CSV), response.content_type());
        assert_eq!(
            Some("attachment; filename=venues.csv"),
            response.headers().get_one("Content-Disposition")
        );
        let body = response.into_string().await.unwrap();
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(
            vec![
                "Venue Name,Address,Zip Code,Phone,Web Address,Email",
                "Town Hall,1 Main Street,12345,,,",
            ],
            lines
        );
    }

    #[rocket::async_test]
    async fn pdf_download_is_named_venue_pdf() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let ada = add_user_with_password(&mut repository, "ada", "analytical").await;

        let response = client
            .get("/venues/export/pdf")
            .private_cookie(login_cookie(&ada))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(
            Some("attachment; filename=venue.pdf"),
            response.headers().get_one("Content-Disposition")
        );
        assert!(response.into_bytes().await.unwrap().starts_with(b"%PDF"));
    }
}
