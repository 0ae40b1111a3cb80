pub mod blocks;
pub mod extract;
pub mod layout;

use scraper::Html;

use crate::record::CollegeRecord;
use crate::sources::Site;
use extract::MalformedField;

/// Parse one fetched page and fill the record from the site's field table.
pub fn process_page(
    site: Site,
    html: &str,
    record: &mut CollegeRecord,
) -> Result<usize, MalformedField> {
    let doc = Html::parse_document(html);
    extract::apply_fields(&doc, site.layout(), site.fields(), record)
}
