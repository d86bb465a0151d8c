//! Comment parts for PowerPoint presentations.
//!
//! Readers and writers for `/ppt/commentAuthors.xml` (the package-wide
//! author table) and `/ppt/comments/commentN.xml` (one list per slide).

use crate::common::xml::{attr_i64, attr_string, attr_u32, escape_xml, push_reference};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A comment author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAuthor {
    /// Author ID, referenced by `Comment::author_id`
    pub id: u32,
    /// Author name
    pub name: String,
    /// Author initials
    pub initials: String,
    /// Index of the last comment this author made
    pub last_idx: u32,
    /// Color index used to tell authors apart
    pub color_idx: u32,
}

impl CommentAuthor {
    /// Create a new comment author.
    pub fn new(id: u32, name: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            initials: initials.into(),
            last_idx: 0,
            // Color index cycles through 0-5
            color_idx: id % 6,
        }
    }

    pub fn with_last_idx(mut self, last_idx: u32) -> Self {
        self.last_idx = last_idx;
        self
    }

    /// Generate XML element for this author.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<p:cmAuthor id="{}" name="{}" initials="{}" lastIdx="{}" clrIdx="{}"/>"#,
            self.id,
            escape_xml(&self.name),
            escape_xml(&self.initials),
            self.last_idx,
            self.color_idx
        )
    }
}

/// A comment attached to a position on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment author ID
    pub author_id: u32,
    /// Comment text
    pub text: String,
    /// X position
    pub x: i64,
    /// Y position
    pub y: i64,
    /// Comment date/time as string (ISO 8601 format)
    pub datetime: Option<String>,
    /// Comment index, unique per author
    pub index: Option<u32>,
}

impl Comment {
    /// Create a new comment.
    pub fn new(author_id: u32, text: impl Into<String>, x: i64, y: i64) -> Self {
        Self {
            author_id,
            text: text.into(),
            x,
            y,
            datetime: None,
            index: None,
        }
    }

    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Generate XML element for this comment.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256);

        xml.push_str(r#"<p:cm authorId=""#);
        xml.push_str(&self.author_id.to_string());
        xml.push('"');

        if let Some(ref dt) = self.datetime {
            xml.push_str(r#" dt=""#);
            xml.push_str(&escape_xml(dt));
            xml.push('"');
        }

        if let Some(idx) = self.index {
            xml.push_str(r#" idx=""#);
            xml.push_str(&idx.to_string());
            xml.push('"');
        }

        xml.push('>');

        xml.push_str(r#"<p:pos x=""#);
        xml.push_str(&self.x.to_string());
        xml.push_str(r#"" y=""#);
        xml.push_str(&self.y.to_string());
        xml.push_str(r#""/>"#);

        xml.push_str("<p:text>");
        xml.push_str(&escape_xml(&self.text));
        xml.push_str("</p:text>");

        xml.push_str("</p:cm>");

        xml
    }
}

/// Generate comments part XML.
///
/// Creates the complete `/ppt/comments/commentN.xml` content.
pub fn generate_comments_xml(comments: &[Comment]) -> String {
    let mut xml = String::with_capacity(1024);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<p:cmLst xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    );

    for comment in comments {
        xml.push_str(&comment.to_xml());
    }

    xml.push_str("</p:cmLst>");

    xml
}

/// Generate comment authors part XML.
///
/// Creates the complete `/ppt/commentAuthors.xml` content.
pub fn generate_comment_authors_xml(authors: &[CommentAuthor]) -> String {
    let mut xml = String::with_capacity(512);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<p:cmAuthorLst xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    );

    for author in authors {
        xml.push_str(&author.to_xml());
    }

    xml.push_str("</p:cmAuthorLst>");

    xml
}

/// Parse the comments of one slide, in document order.
///
/// A `p:cm` without an `authorId` cannot be attributed and is a format error.
pub fn parse_comments(xml: &[u8]) -> Result<Vec<Comment>> {
    let mut reader = Reader::from_reader(xml);
    // Text is not trimmed: whitespace next to entity references is content

    let mut comments = Vec::new();
    let mut current: Option<Comment> = None;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"cm" => current = Some(read_comment_start(e)?),
                b"pos" => read_position(e, current.as_mut()),
                b"text" => in_text = true,
                _ => {},
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                // A self-closing <p:cm/> has no children to wait for
                b"cm" => comments.push(read_comment_start(e)?),
                b"pos" => read_position(e, current.as_mut()),
                _ => {},
            },
            Ok(Event::Text(e)) if in_text => {
                if let Some(comment) = current.as_mut() {
                    comment.text.push_str(std::str::from_utf8(e.as_ref())?);
                }
            },
            Ok(Event::GeneralRef(e)) if in_text => {
                if let Some(comment) = current.as_mut() {
                    push_reference(&mut comment.text, &e);
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"cm" => {
                    if let Some(comment) = current.take() {
                        comments.push(comment);
                    }
                },
                b"text" => in_text = false,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("Comments parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(comments)
}

fn read_comment_start(e: &BytesStart<'_>) -> Result<Comment> {
    let author_id = attr_u32(e, b"authorId")
        .ok_or_else(|| OoxmlError::Format("comment without a numeric authorId".to_string()))?;
    let mut comment = Comment::new(author_id, String::new(), 0, 0);
    comment.datetime = attr_string(e, b"dt");
    comment.index = attr_u32(e, b"idx");
    Ok(comment)
}

fn read_position(e: &BytesStart<'_>, comment: Option<&mut Comment>) {
    if let Some(comment) = comment {
        comment.x = attr_i64(e, b"x").unwrap_or(0);
        comment.y = attr_i64(e, b"y").unwrap_or(0);
    }
}

/// Parse the package-wide comment author table, in document order.
pub fn parse_comment_authors(xml: &[u8]) -> Result<Vec<CommentAuthor>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"cmAuthor" {
                    let id = attr_u32(e, b"id").ok_or_else(|| {
                        OoxmlError::Format("comment author without a numeric id".to_string())
                    })?;
                    authors.push(CommentAuthor {
                        id,
                        name: attr_string(e, b"name").unwrap_or_default(),
                        initials: attr_string(e, b"initials").unwrap_or_default(),
                        last_idx: attr_u32(e, b"lastIdx").unwrap_or(0),
                        color_idx: attr_u32(e, b"clrIdx").unwrap_or(0),
                    });
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("Comment authors parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(authors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_round_trip_through_xml() {
        let comments = vec![
            Comment::new(0, "testdoc", 10, 20)
                .with_datetime("2008-03-20T10:09:11.371")
                .with_index(1),
            Comment::new(1, "Q&A <later>", 0, 0),
        ];
        let parsed = parse_comments(generate_comments_xml(&comments).as_bytes()).unwrap();
        assert_eq!(parsed, comments);
    }

    #[test]
    fn test_authors_round_trip_through_xml() {
        let authors = vec![
            CommentAuthor::new(0, "XPVMWARE01", "X").with_last_idx(2),
            CommentAuthor::new(7, "R & D", "RD"),
        ];
        let parsed =
            parse_comment_authors(generate_comment_authors_xml(&authors).as_bytes()).unwrap();
        assert_eq!(parsed, authors);
        assert_eq!(parsed[1].color_idx, 1);
    }

    #[test]
    fn test_comment_without_author_is_format_error() {
        let xml = br#"<p:cmLst xmlns:p="p"><p:cm idx="1"><p:text>x</p:text></p:cm></p:cmLst>"#;
        assert!(matches!(parse_comments(xml), Err(OoxmlError::Format(_))));
    }

    #[test]
    fn test_empty_comment_element() {
        let xml = br#"<p:cmLst xmlns:p="p"><p:cm authorId="2"/></p:cmLst>"#;
        let parsed = parse_comments(xml).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].author_id, 2);
        assert!(parsed[0].text.is_empty());
    }

    #[test]
    fn test_empty_lists() {
        assert!(parse_comments(br#"<p:cmLst xmlns:p="p"/>"#).unwrap().is_empty());
        assert!(parse_comment_authors(br#"<p:cmAuthorLst xmlns:p="p"/>"#).unwrap().is_empty());
    }
}
