use std::io::BufRead;

use arcana_catalog::{Caster, Component, School, Spell};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;

use crate::error::XmlError;

/// Parse an XML spellbook.
///
/// Format:
/// ```text
/// <spellbook name="Player's Handbook">
///     <spell level="3" school="evocation" ritual="false" guild="false">
///         <name>Fireball</name>
///         <category/>
///         <range>150 feet</range>
///         <duration>Instantaneous</duration>
///         <casting-time>1 action</casting-time>
///         <description>A bright streak flashes...</description>
///         <casters><sorcerer/><wizard/></casters>
///         <components><verbal/><somatic/><material>bat guano</material></components>
///     </spell>
/// </spellbook>
/// ```
///
/// The root element's `name` attribute is the book of every spell in the file.
pub fn parse_spellbook<R: BufRead>(reader: R) -> Result<Vec<Spell>, XmlError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut book: Option<String> = None;
    let mut spells = Vec::new();

    let mut current: Option<SpellDraft> = None;
    let mut section = Section::Fields;
    let mut current_tag = String::new();
    let mut text = String::new();
    // Markup elements open inside the current field, e.g. `<b>` in a description.
    let mut nested = 0usize;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if book.is_none() => {
                book = Some(book_name(e)?);
            }
            Event::Start(ref e) => {
                let book = book.as_deref().unwrap_or_default();
                let tag = tag_name(e.name());
                match current {
                    None => {
                        if tag == "spell" {
                            current = Some(SpellDraft::start(book, e)?);
                        }
                    }
                    Some(_) if !current_tag.is_empty() => nested += 1,
                    Some(ref mut draft) => match section {
                        Section::Casters => draft.casters.push(tag.parse()?),
                        Section::Components if is_material(&tag) => {
                            current_tag = tag;
                            text.clear();
                        }
                        Section::Components => draft.components.push(simple_component(&tag)),
                        Section::Fields => match tag.as_str() {
                            "casters" => section = Section::Casters,
                            "components" => section = Section::Components,
                            _ => {
                                current_tag = tag;
                                text.clear();
                            }
                        },
                    },
                }
            }
            Event::Empty(ref e) => {
                let book = book.as_deref().unwrap_or_default();
                let tag = tag_name(e.name());
                match current {
                    None => {
                        if tag == "spell" {
                            spells.push(SpellDraft::start(book, e)?.finish()?);
                        }
                    }
                    Some(_) if !current_tag.is_empty() => {}
                    Some(ref mut draft) => match section {
                        Section::Casters => draft.casters.push(tag.parse()?),
                        Section::Components if is_material(&tag) => {
                            draft.components.push(Component::material(None));
                        }
                        Section::Components => draft.components.push(simple_component(&tag)),
                        Section::Fields => {
                            if tag != "casters" && tag != "components" {
                                draft.set_field(&tag, String::new());
                            }
                        }
                    },
                }
            }
            Event::Text(ref e) => {
                if !current_tag.is_empty() {
                    push_text(&mut text, &e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if !current_tag.is_empty() {
                    push_text(&mut text, &String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => {
                let tag = tag_name(e.name());
                if nested > 0 {
                    nested -= 1;
                } else if let Some(ref mut draft) = current {
                    match section {
                        Section::Casters => {
                            if tag == "casters" {
                                section = Section::Fields;
                            }
                        }
                        Section::Components => {
                            if tag == "components" {
                                section = Section::Fields;
                            } else if tag == current_tag {
                                let details = std::mem::take(&mut text);
                                let details = (!details.is_empty()).then_some(details);
                                draft.components.push(Component::material(details));
                                current_tag.clear();
                            }
                        }
                        Section::Fields => {
                            if tag == "spell" {
                                if let Some(draft) = current.take() {
                                    spells.push(draft.finish()?);
                                }
                            } else if tag == current_tag {
                                draft.set_field(&tag, std::mem::take(&mut text));
                                current_tag.clear();
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if book.is_none() {
        return Err(XmlError::invalid_spellbook("No root element found"));
    }

    Ok(spells)
}

/// Which part of a `<spell>` element the reader is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Fields,
    Casters,
    Components,
}

/// A spell whose child elements are still being read.
#[derive(Debug)]
struct SpellDraft {
    book: String,
    level: u32,
    school: School,
    ritual: bool,
    guild: bool,
    name: Option<String>,
    category: Option<String>,
    range: Option<String>,
    duration: Option<String>,
    casting_time: Option<String>,
    description: Option<String>,
    casters: Vec<Caster>,
    components: Vec<Component>,
}

impl SpellDraft {
    fn start(book: &str, e: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut level = None;
        let mut school = None;
        let mut ritual = false;
        let mut guild = false;

        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"level" => {
                    level = Some(value.trim().parse::<u32>().map_err(|_| {
                        XmlError::invalid_spellbook(format!("Invalid spell level: {value}"))
                    })?);
                }
                b"school" => school = Some(value.parse::<School>()?),
                b"ritual" => ritual = value.trim().eq_ignore_ascii_case("true"),
                b"guild" => guild = value.trim().eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        Ok(Self {
            book: book.to_string(),
            level: level
                .ok_or_else(|| XmlError::invalid_spellbook("Spell without a level attribute"))?,
            school: school
                .ok_or_else(|| XmlError::invalid_spellbook("Spell without a school attribute"))?,
            ritual,
            guild,
            name: None,
            category: None,
            range: None,
            duration: None,
            casting_time: None,
            description: None,
            casters: Vec::new(),
            components: Vec::new(),
        })
    }

    fn set_field(&mut self, tag: &str, value: String) {
        match tag {
            "name" => self.name = Some(value),
            "category" => self.category = Some(value),
            "range" => self.range = Some(value),
            "duration" => self.duration = Some(value),
            "casting-time" => self.casting_time = Some(value),
            "description" => self.description = Some(value),
            other => log::debug!("Ignoring unknown spell element <{}>", other),
        }
    }

    fn finish(self) -> Result<Spell, XmlError> {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| XmlError::invalid_spellbook("Spell without a name"))?;
        let required = |field: &str, value: Option<String>| {
            value.ok_or_else(|| {
                XmlError::invalid_spellbook(format!("Spell '{name}' is missing <{field}>"))
            })
        };
        let range = required("range", self.range)?;
        let duration = required("duration", self.duration)?;
        let casting_time = required("casting-time", self.casting_time)?;
        let description = required("description", self.description)?;

        if self.casters.is_empty() {
            return Err(XmlError::invalid_spellbook(format!(
                "Spell '{name}' has no casters"
            )));
        }

        Ok(Spell {
            book: self.book,
            name,
            level: self.level,
            school: self.school,
            ritual: self.ritual,
            guild: self.guild,
            category: self.category.filter(|c| !c.is_empty()),
            range,
            duration,
            casting_time,
            description,
            casters: self.casters,
            components: self.components,
        })
    }
}

fn book_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"name" {
            let name = attr.unescape_value()?.trim().to_string();
            if !name.is_empty() {
                return Ok(name);
            }
        }
    }
    Err(XmlError::invalid_spellbook(
        "Root element has no book name attribute",
    ))
}

/// Append a trimmed text chunk, separating it from earlier chunks of the
/// same field with a space.
fn push_text(text: &mut String, chunk: &str) {
    if chunk.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(chunk);
}

fn tag_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).to_string()
}

fn is_material(tag: &str) -> bool {
    tag.eq_ignore_ascii_case(Component::MATERIAL)
}

fn simple_component(tag: &str) -> Component {
    Component::simple(tag.to_ascii_lowercase())
}

#[cfg(test)]
#[path = "tests/spellbook_tests.rs"]
mod tests;
