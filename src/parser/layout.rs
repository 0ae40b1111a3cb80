use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::blocks::{InfoBlock, Line};

static HEADING_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td > h2").unwrap());
static CONTAINER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.col-sm-4").unwrap());

/// How a site arranges its info blocks. Callers only ever see `InfoBlock`s;
/// a name that matches zero or several places on the page is `None`.
pub trait BlockLayout: Sync {
    fn block(&self, doc: &Html, name: &str) -> Option<InfoBlock>;
}

/// `<td><h2>Name</h2><p>label: value</p>…</td>`, the BigFuture print profile.
pub struct HeadingBlocks;

/// `<div class="col-sm-4"><div>Label</div><div>value</div></div>`, one
/// container per fact, as on Princeton Review pages.
pub struct LabeledContainers;

impl BlockLayout for HeadingBlocks {
    fn block(&self, doc: &Html, name: &str) -> Option<InfoBlock> {
        let heading = unique(doc.select(&HEADING_SEL).filter(|h| same_label(&text_of(h), name)))?;
        let cell = heading.parent().and_then(ElementRef::wrap)?;

        let descriptors: Vec<String> = cell
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "p")
            .map(|p| text_of(&p))
            .collect();

        Some(InfoBlock::from_raw(
            text_of(&heading),
            descriptors.iter().map(String::as_str),
        ))
    }
}

impl BlockLayout for LabeledContainers {
    fn block(&self, doc: &Html, name: &str) -> Option<InfoBlock> {
        let container = unique(doc.select(&CONTAINER_SEL).filter(|div| {
            let children: Vec<_> = div.children().filter_map(ElementRef::wrap).collect();
            children.len() > 1 && same_label(&text_of(&children[0]), name)
        }))?;

        let children: Vec<_> = container.children().filter_map(ElementRef::wrap).collect();
        let label = text_of(children.first()?);
        let value = text_of(children.last()?);

        Some(InfoBlock::new(label.clone(), vec![Line::Pair { label, value }]))
    }
}

fn unique<T>(mut matches: impl Iterator<Item = T>) -> Option<T> {
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

fn text_of(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn same_label(found: &str, wanted: &str) -> bool {
    found.trim().to_lowercase() == wanted.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADINGS: &str = r#"
        <table><tr>
          <td>
            <h2>Quick Facts</h2>
            <p>4-year</p>
            <p>Total undergraduates: 7,083</p>
            <p>In-State Tuition: $10,560</p>
          </td>
          <td>
            <h2>ACT Math</h2>
            <p>30 - 36: 12%</p>
          </td>
          <td><h2>ACT Math</h2><p>30 - 36: 99%</p></td>
        </tr></table>"#;

    const CONTAINERS: &str = r#"
        <div class="row">
          <div class="col-sm-4"><div>Applicants</div><div> 12,345 </div></div>
          <div class="col-sm-4"><div>Acceptance Rate</div><div>62%</div></div>
          <div class="col-sm-4"><div>Lonely label</div></div>
          <div class="col-sm-4"><div>SAT Range</div><div>1100 - 1300</div></div>
          <div class="col-sm-4"><div>SAT Range</div><div>1200 - 1400</div></div>
        </div>"#;

    #[test]
    fn heading_block_lines_in_order() {
        let doc = Html::parse_document(HEADINGS);
        let block = HeadingBlocks.block(&doc, "quick facts").unwrap();
        assert_eq!(block.name, "Quick Facts");
        assert_eq!(block.lines.len(), 3);
        assert_eq!(block.descriptor(0), Some("4-year"));
        assert_eq!(block.property("Total undergraduates"), Ok(Some("7,083")));
    }

    #[test]
    fn duplicate_heading_is_absent() {
        let doc = Html::parse_document(HEADINGS);
        assert!(HeadingBlocks.block(&doc, "ACT Math").is_none());
    }

    #[test]
    fn missing_heading_is_absent() {
        let doc = Html::parse_document(HEADINGS);
        assert!(HeadingBlocks.block(&doc, "Early Decision and Action").is_none());
    }

    #[test]
    fn container_block_exposes_a_pair() {
        let doc = Html::parse_document(CONTAINERS);
        let block = LabeledContainers.block(&doc, "applicants").unwrap();
        assert_eq!(block.property("Applicants"), Ok(Some("12,345")));
        let block = LabeledContainers.block(&doc, "Acceptance Rate").unwrap();
        assert_eq!(block.property("acceptance rate"), Ok(Some("62%")));
    }

    #[test]
    fn container_without_value_is_absent() {
        let doc = Html::parse_document(CONTAINERS);
        assert!(LabeledContainers.block(&doc, "Lonely label").is_none());
    }

    #[test]
    fn duplicate_container_is_absent() {
        let doc = Html::parse_document(CONTAINERS);
        assert!(LabeledContainers.block(&doc, "SAT Range").is_none());
    }

    #[test]
    fn container_value_may_contain_colons() {
        let doc = Html::parse_document(
            r#"<div class="col-sm-4"><div>Student/Faculty Ratio</div><div>14:1</div></div>"#,
        );
        let block = LabeledContainers.block(&doc, "Student/Faculty Ratio").unwrap();
        assert_eq!(block.property("Student/Faculty Ratio"), Ok(Some("14:1")));
    }
}
