use crate::injector::ANNOTATION_KEY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLine {
    /// 1-based line number in the input.
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Deduplication {
    pub content: String,
    pub removed: Vec<RemovedLine>,
}

impl Deduplication {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Drop every annotation line whose previously kept line is also an
/// annotation line. A run of consecutive annotation lines collapses to its
/// first line. Annotations separated by any other line are all kept.
pub fn remove_duplicates(content: &str) -> Deduplication {
    let mut cleaned = String::with_capacity(content.len());
    let mut removed = Vec::new();
    let mut prev_was_annotation = false;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let is_annotation = line.contains(ANNOTATION_KEY);

        if is_annotation && prev_was_annotation {
            tracing::info!("Removing duplicate: {}", line.trim());
            removed.push(RemovedLine {
                line_number: index + 1,
                text: line.trim().to_string(),
            });
            continue;
        }

        cleaned.push_str(line);
        prev_was_annotation = is_annotation;
    }

    Deduplication {
        content: cleaned,
        removed,
    }
}
