//! Minimal reader for the XML subset the tool emits with `--xml`.
//!
//! The output of `log --xml` and `list --xml` is machine-generated,
//! well-formed and tiny in vocabulary: elements, attributes, character
//! data and the five named entities. This reader covers exactly that
//! subset (plus numeric character references, declarations and
//! comments) and nothing more; anything outside it is a parse failure
//! surfaced to the caller.

/// One parsed element with its attributes, children and text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element.
    pub text: String,
}

impl Element {
    /// Value of the attribute `name`, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child element named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child named `name`, if present.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

/// Parse a document and return its root element.
pub(crate) fn parse_document(input: &str) -> Result<Element, String> {
    let mut cursor = Cursor {
        bytes: input.as_bytes(),
        pos: 0,
    };
    cursor.skip_misc();
    let root = cursor.parse_element()?;
    cursor.skip_misc();
    if cursor.pos != cursor.bytes.len() {
        return Err(format!("trailing content at offset {}", cursor.pos));
    }
    Ok(root)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.pos..].starts_with(prefix.as_bytes())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Skip whitespace, the XML declaration, comments and doctype-like
    /// constructs between elements.
    fn skip_misc(&mut self) {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.skip_until("?>");
            } else if self.starts_with("<!--") {
                self.skip_until("-->");
            } else if self.starts_with("<!") {
                self.skip_until(">");
            } else {
                return;
            }
        }
    }

    fn skip_until(&mut self, end: &str) {
        match self.bytes[self.pos..]
            .windows(end.len())
            .position(|w| w == end.as_bytes())
        {
            Some(offset) => self.pos += offset + end.len(),
            None => self.pos = self.bytes.len(),
        }
    }

    fn read_name(&mut self) -> Result<String, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, b'-' | b'_' | b':' | b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(format!("expected name at offset {start}"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    fn expect(&mut self, c: u8) -> Result<(), String> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(format!(
                "expected '{}' at offset {}",
                c as char, self.pos
            ))
        }
    }

    fn parse_element(&mut self) -> Result<Element, String> {
        self.expect(b'<')?;
        let name = self.read_name()?;
        let mut element = Element {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        };

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>')?;
                    return Ok(element);
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let attr_name = self.read_name()?;
                    self.skip_whitespace();
                    self.expect(b'=')?;
                    self.skip_whitespace();
                    let quote = self
                        .peek()
                        .filter(|c| matches!(c, b'"' | b'\''))
                        .ok_or_else(|| format!("expected quote at offset {}", self.pos))?;
                    self.pos += 1;
                    let start = self.pos;
                    while self.peek().is_some() && self.peek() != Some(quote) {
                        self.pos += 1;
                    }
                    let raw = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
                    self.expect(quote)?;
                    element.attributes.push((attr_name, decode_entities(&raw)?));
                }
                None => return Err("unexpected end of input in tag".to_string()),
            }
        }

        // Content: character data and child elements until the end tag.
        loop {
            match self.peek() {
                None => return Err(format!("missing end tag for <{}>", element.name)),
                Some(b'<') => {
                    if self.starts_with("</") {
                        self.pos += 2;
                        let closing = self.read_name()?;
                        if closing != element.name {
                            return Err(format!(
                                "mismatched end tag: expected </{}>, found </{closing}>",
                                element.name
                            ));
                        }
                        self.skip_whitespace();
                        self.expect(b'>')?;
                        return Ok(element);
                    } else if self.starts_with("<!--") {
                        self.skip_until("-->");
                    } else {
                        element.children.push(self.parse_element()?);
                    }
                }
                Some(_) => {
                    let start = self.pos;
                    while self.peek().is_some() && self.peek() != Some(b'<') {
                        self.pos += 1;
                    }
                    let raw = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
                    element.text.push_str(&decode_entities(&raw)?);
                }
            }
        }
    }
}

/// Decode the named and numeric character references the tool emits.
fn decode_entities(input: &str) -> Result<String, String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| format!("unterminated entity in '{input}'"))?;
        let entity = &after[..semi];
        match entity {
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "amp" => out.push('&'),
            "apos" => out.push('\''),
            "quot" => out.push('"'),
            _ => {
                let code = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .ok_or_else(|| format!("unknown entity '&{entity};'"))?
                    .map_err(|_| format!("invalid character reference '&{entity};'"))?;
                out.push(
                    char::from_u32(code)
                        .ok_or_else(|| format!("invalid character reference '&{entity};'"))?,
                );
            }
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
