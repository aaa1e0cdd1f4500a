use std::io::Cursor;

use rocket::{
    http::{ContentType, Header},
    response::Responder,
    Request, Response,
};

use crate::error::Result;
use crate::model::db::{form::Form, response::FormResponse};

/// Render a form's responses as a rectangular CSV table.
///
/// Columns are `Q{n}: {question text}` in question order; rows are one per
/// response with answers placed by index. Quoting follows RFC 4180 via the
/// `csv` writer. Headers are derived from the current question text, not
/// stored with the responses.
pub fn responses_csv(form: &Form, responses: &[FormResponse]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let headers = form
        .questions
        .iter()
        .enumerate()
        .map(|(idx, question)| format!("Q{}: {}", idx + 1, question.text));
    writer.write_record(headers)?;

    for response in responses {
        writer.write_record(&response.answers)?;
    }

    let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    // The writer only ever receives `String`s, so the buffer is valid UTF-8.
    Ok(String::from_utf8(bytes).expect("CSV output is UTF-8"))
}

/// The download filename: each whitespace run in the title becomes a single
/// underscore, including runs at the edges.
pub fn export_filename(title: &str) -> String {
    let mut flattened = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                flattened.push('_');
            }
            in_whitespace = true;
        } else {
            flattened.push(c);
            in_whitespace = false;
        }
    }
    format!("{flattened}_responses.csv")
}

/// A CSV document served as a file download.
pub struct CsvAttachment {
    filename: String,
    body: String,
}

impl CsvAttachment {
    pub fn new(filename: String, body: String) -> Self {
        Self { filename, body }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for CsvAttachment {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'o> {
        Response::build()
            .header(ContentType::CSV)
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            ))
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_in_order() {
        let form = Form::example();
        let responses = vec![
            FormResponse::with_answers(form.id, vec!["Daily", "More soup", "Nope"]),
            FormResponse::with_answers(form.id, vec!["Weekly", "Less rice", "Cheers"]),
        ];

        let csv = responses_csv(&form, &responses).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Q1: How often do you eat here?,Q2: What should we add to the menu?,Q3: Any other comments?"
        );
        assert_eq!(lines.next().unwrap(), "Daily,More soup,Nope");
        assert_eq!(lines.next().unwrap(), "Weekly,Less rice,Cheers");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let form = Form::example();
        let responses = vec![FormResponse::with_answers(
            form.id,
            vec!["Daily", "soup, noodles and \"pho\"", "Nope"],
        )];

        let csv = responses_csv(&form, &responses).unwrap();
        let data_row = csv.lines().nth(1).unwrap();
        assert_eq!(data_row, "Daily,\"soup, noodles and \"\"pho\"\"\",Nope");
    }

    #[test]
    fn no_responses_gives_header_only() {
        let form = Form::example();
        let csv = responses_csv(&form, &[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn filename_flattens_whitespace() {
        assert_eq!(
            export_filename("Canteen  feedback form"),
            "Canteen_feedback_form_responses.csv"
        );
    }

    #[test]
    fn filename_keeps_edge_whitespace_runs() {
        assert_eq!(export_filename(" My Form "), "_My_Form__responses.csv");
    }
}
