//! Bare-URL autolinking.
//!
//! CommonMark only autolinks `<http://...>` spans; register descriptions
//! habitually paste URLs bare. This adapter rewrites text events into
//! link/text/link-end triples, leaving code spans, code blocks and existing
//! links untouched.

use std::collections::VecDeque;
use std::ops::Range;

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, LinkType, Tag, TagEnd};
use regex::Regex;

static BARE_URL: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"https?://[^\s<>]+").unwrap()
});

/// Strip trailing punctuation that is almost certainly sentence structure
/// rather than part of the URL.
fn trim_url(url: &str) -> &str {
	url.trim_end_matches(&['.', ',', ';', ':', '!', '?', ')', '\'', '"'][..])
}

/// Iterator adapter that splits bare URLs out of text events.
pub(crate) struct Linkify<'a, I> {
	inner: I,
	enabled: bool,
	code_blocks: usize,
	links: usize,
	queued: VecDeque<(Event<'a>, Range<usize>)>,
}

impl<'a, I> Linkify<'a, I>
where
	I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
	pub(crate) fn new(inner: I, enabled: bool) -> Self {
		Self {
			inner,
			enabled,
			code_blocks: 0,
			links: 0,
			queued: VecDeque::new(),
		}
	}
}

impl<'a, I> Iterator for Linkify<'a, I>
where
	I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
	type Item = (Event<'a>, Range<usize>);

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(queued) = self.queued.pop_front() {
			return Some(queued);
		}

		let (event, range) = self.inner.next()?;
		match &event {
			Event::Start(Tag::CodeBlock(_)) => self.code_blocks += 1,
			Event::End(TagEnd::CodeBlock) => self.code_blocks = self.code_blocks.saturating_sub(1),
			Event::Start(Tag::Link { .. } | Tag::Image { .. }) => self.links += 1,
			Event::End(TagEnd::Link | TagEnd::Image) => self.links = self.links.saturating_sub(1),
			_ => {}
		}

		if self.enabled
			&& self.code_blocks == 0
			&& self.links == 0
			&& let Event::Text(text) = &event
			&& BARE_URL.is_match(text)
		{
			self.queued.extend(link_events(text, &range));
			return self.queued.pop_front();
		}

		Some((event, range))
	}
}

/// Split a text run into plain text and autolink events.
fn link_events(text: &str, range: &Range<usize>) -> Vec<(Event<'static>, Range<usize>)> {
	let mut out = Vec::new();
	let mut cursor = 0usize;
	for found in BARE_URL.find_iter(text) {
		let url = trim_url(found.as_str());
		if url.is_empty() {
			continue;
		}
		if found.start() > cursor {
			out.push((
				Event::Text(text[cursor..found.start()].to_string().into()),
				range.clone(),
			));
		}
		out.push((
			Event::Start(Tag::Link {
				link_type: LinkType::Autolink,
				dest_url: url.to_string().into(),
				title: "".into(),
				id: "".into(),
			}),
			range.clone(),
		));
		out.push((Event::Text(url.to_string().into()), range.clone()));
		out.push((Event::End(TagEnd::Link), range.clone()));
		cursor = found.start() + url.len();
	}
	if cursor < text.len() {
		out.push((Event::Text(text[cursor..].to_string().into()), range.clone()));
	}
	out
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn collect(text: &str) -> Vec<Event<'static>> {
		link_events(text, &(0..text.len()))
			.into_iter()
			.map(|(event, _)| event)
			.collect()
	}

	#[test]
	fn splits_url_out_of_surrounding_text() {
		let events = collect("see https://example.com/guide for details");
		assert_eq!(events.len(), 5);
		assert_eq!(events[0], Event::Text("see ".into()));
		assert!(matches!(
			&events[1],
			Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "https://example.com/guide"
		));
		assert_eq!(events[2], Event::Text("https://example.com/guide".into()));
		assert_eq!(events[3], Event::End(TagEnd::Link));
		assert_eq!(events[4], Event::Text(" for details".into()));
	}

	#[test]
	fn trailing_punctuation_stays_text() {
		let events = collect("read http://example.com.");
		assert!(matches!(
			&events[1],
			Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "http://example.com"
		));
		assert_eq!(events.last(), Some(&Event::Text(".".into())));
	}
}
