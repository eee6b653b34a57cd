use crate::domain::posts::{Post, country_flag, thumbnail};
use crate::util::dates::format_created_at;

const HEADERS: [&str; 7] = ["ID", "Image", "Post ID", "Platform", "Country", "Status", "Created"];
const COLUMN_GAP: &str = "  ";

#[derive(Clone)]
pub struct AdminPostRowView {
    pub id: i64,
    pub thumbnail: String,
    pub post_id: String,
    pub platform: String,
    pub country: String,
    pub status_label: String,
    pub created: String,
    /// Cells joined with column padding, ready to print.
    pub line: String,
}

impl AdminPostRowView {
    fn from_post(post: &Post) -> Self {
        Self {
            id: post.id,
            thumbnail: thumbnail(post).to_string(),
            post_id: post.post_id.clone(),
            platform: post.platform.clone(),
            country: format!("{} {}", country_flag(&post.country), post.country),
            status_label: format!("[{}]", post.status),
            created: format_created_at(&post.created_at),
            line: String::new(),
        }
    }

    fn cells(&self) -> [String; 7] {
        [
            self.id.to_string(),
            self.thumbnail.clone(),
            self.post_id.clone(),
            self.platform.clone(),
            self.country.clone(),
            self.status_label.clone(),
            self.created.clone(),
        ]
    }
}

#[derive(Clone)]
pub struct AdminPostTableView {
    pub header: String,
    pub rows: Vec<AdminPostRowView>,
    pub empty_message: String,
}

impl AdminPostTableView {
    pub fn new(posts: &[Post]) -> Self {
        let mut rows: Vec<AdminPostRowView> =
            posts.iter().map(AdminPostRowView::from_post).collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for row in &mut rows {
            row.line = join_padded(&row.cells(), &widths);
        }

        Self {
            header: join_padded(&HEADERS.map(str::to_string), &widths),
            rows,
            empty_message: "No posts yet. Use `add` to create one.".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::PostStatus;

    #[test]
    fn columns_align_to_widest_cell() {
        let posts = vec![
            Post {
                id: 1,
                post_id: "P1".into(),
                platform: "eBay".into(),
                country: "US".into(),
                status: PostStatus::Available,
                image_url: None,
                created_at: "2024-01-01".into(),
                updated_at: None,
            },
            Post {
                id: 22,
                post_id: "LONG-POST-ID".into(),
                platform: "Facebook Marketplace".into(),
                country: "CA".into(),
                status: PostStatus::OnHold,
                image_url: Some("https://cdn.example/x.png".into()),
                created_at: "2024-05-06T07:08:09".into(),
                updated_at: None,
            },
        ];
        let table = AdminPostTableView::new(&posts);

        let platform_col = table.header.find("Platform").expect("header column");
        for row in &table.rows {
            let offset = row.line.find(&row.platform).expect("platform cell");
            assert_eq!(
                row.line[..offset].chars().count(),
                table.header[..platform_col].chars().count()
            );
        }
        assert_eq!(table.rows[1].status_label, "[On Hold]");
        assert_eq!(table.rows[1].created, "2024-05-06");
    }
}
