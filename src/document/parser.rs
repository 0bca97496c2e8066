//! # Node-Tree Parser
//!
//! Turns X3D markup into a [`SceneNode`] tree without knowing anything about
//! X3D. Every element becomes a node and every attribute keeps its unescaped
//! string value. Text and CDATA are concatenated into the node's inner text,
//! dropping whitespace-only runs. Declarations, doctypes and processing
//! instructions are skipped.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::node::SceneNode;
use crate::error::ParseError;

/// Parses an in-memory X3D document
pub fn parse_str(text: &str) -> Result<SceneNode, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(false);
    // Mismatches are reported through our own error variants
    config.check_end_names = false;

    let mut stack: Vec<SceneNode> = Vec::new();
    let mut root: Option<SceneNode> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|source| ParseError::Xml { position, source })?;

        match event {
            Event::Start(start) => {
                let node = open_element(&start, position)?;
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::MultipleRoots(node.name().to_string()));
                }
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = open_element(&start, position)?;
                close_element(node, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let node = stack.pop().ok_or_else(|| ParseError::UnmatchedEnd(found.clone()))?;
                if node.name() != found {
                    return Err(ParseError::MismatchedEnd {
                        expected: node.name().to_string(),
                        found,
                    });
                }
                close_element(node, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|source| ParseError::Xml { position, source })?;
                add_text(&mut stack, &text, position)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data);
                add_text(&mut stack, &text, position)?;
            }
            Event::Comment(comment) => {
                // Comments before or after the root have no owner and are dropped
                if let Some(node) = stack.last_mut() {
                    node.push_comment(String::from_utf8_lossy(&comment).into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Unclosed(open.name().to_string()));
    }
    root.ok_or(ParseError::NoRootElement)
}

/// Reads and parses an X3D file from disk
pub fn parse_file(path: impl AsRef<Path>) -> Result<SceneNode, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Parsing {} ({} bytes)", path.display(), text.len());
    parse_str(&text)
}

fn open_element(start: &BytesStart<'_>, position: u64) -> Result<SceneNode, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|_| ParseError::InvalidName(position))?
        .to_string();
    let mut node = SceneNode::new(name);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| ParseError::Xml {
            position,
            source: err.into(),
        })?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|_| ParseError::InvalidName(position))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|source| ParseError::Xml { position, source })?;
        node.set_attr(key, value.into_owned());
    }

    Ok(node)
}

fn close_element(
    node: SceneNode,
    stack: &mut [SceneNode],
    root: &mut Option<SceneNode>,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(node),
        None if root.is_some() => {
            return Err(ParseError::MultipleRoots(node.name().to_string()));
        }
        None => *root = Some(node),
    }
    Ok(())
}

fn add_text(stack: &mut [SceneNode], text: &str, position: u64) -> Result<(), ParseError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(node) => {
            node.append_text(text);
            Ok(())
        }
        None => Err(ParseError::TextOutsideRoot(position)),
    }
}
