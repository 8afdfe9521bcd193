use super::{Document, Inline, Paragraph, Run};

/// Ordered token to value mapping applied to every template of a run.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a token, replacing the value in place if it is already present.
    pub fn insert<V: ToString>(&mut self, token: &str, value: V) {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(t, _)| t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token.to_string(), value)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(token, value)| (token.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: ToString> FromIterator<(K, V)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut placeholders = Self::new();
        for (token, value) in iter {
            placeholders.insert(token.as_ref(), value);
        }
        placeholders
    }
}

/// Replaces tokens in every paragraph of the document, including those in
/// table cells. Returns the number of paragraphs changed.
pub fn substitute(document: &mut Document, placeholders: &Placeholders) -> usize {
    let mut changed = 0;
    document.for_each_paragraph(|paragraph| {
        if substitute_paragraph(paragraph, placeholders) {
            changed += 1;
        }
    });
    changed
}

/// Replaces each token, in mapping order, wherever it occurs in the
/// paragraph text, including occurrences split over several runs.
///
/// A replacement takes the properties of the run the token starts in. Runs
/// outside a token are left alone. Returns whether the text changed; an
/// unchanged paragraph keeps its runs exactly as they were.
pub fn substitute_paragraph(
    paragraph: &mut Paragraph,
    placeholders: &Placeholders,
) -> bool {
    let before = paragraph.text();
    let present = placeholders
        .iter()
        .any(|(token, _)| !token.is_empty() && before.contains(token));
    if !present {
        return false;
    }

    let original = paragraph.inlines.clone();
    for (token, value) in placeholders.iter().filter(|(t, _)| !t.is_empty()) {
        let mut runs: Vec<&mut Run> = paragraph.runs_mut().collect();
        replace_in_runs(&mut runs, token, value);
    }

    if paragraph.text() == before {
        paragraph.inlines = original;
        return false;
    }

    paragraph.inlines.retain(|inline| match inline {
        Inline::Run(run) => !run.text.is_empty(),
        Inline::Opaque(_) => true,
    });
    paragraph.edited = true;
    true
}

fn replace_in_runs(runs: &mut [&mut Run], token: &str, value: &str) -> usize {
    let text: String = runs.iter().map(|run| run.text.as_str()).collect();
    let starts: Vec<usize> =
        text.match_indices(token).map(|(start, _)| start).collect();

    // Back to front so earlier offsets stay valid.
    for &start in starts.iter().rev() {
        splice(runs, start, start + token.len(), value);
    }
    starts.len()
}

/// Replaces bytes `start..end` of the joined run text with `value`.
fn splice(runs: &mut [&mut Run], start: usize, end: usize, value: &str) {
    let mut offset = 0;
    let mut first: Option<(usize, usize)> = None;

    for n in 0..runs.len() {
        let len = runs[n].text.len();
        if first.is_none() && start < offset + len {
            first = Some((n, start - offset));
        }
        if let Some((f, f_offset)) = first {
            if end <= offset + len {
                let e_offset = end - offset;
                if f == n {
                    runs[n].text.replace_range(f_offset..e_offset, value);
                } else {
                    runs[f].text.truncate(f_offset);
                    runs[f].text.push_str(value);
                    for run in runs[f + 1..n].iter_mut() {
                        run.text.clear();
                    }
                    runs[n].text.replace_range(..e_offset, "");
                }
                return;
            }
        }
        offset += len;
    }
}
