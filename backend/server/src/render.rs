//! HTML page for `GET /`.
//!
//! One table row per ranked tip. The thumbs icons post to `/vote` and patch the
//! count in place from the echoed vote, so the page only re-ranks on reload.
use std::fmt::Write;

use crate::{
    error::{AppError, Result},
    models::RankedTip,
    utils::escape_html,
};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>MCProTip</title>
<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.2/css/bootstrap.min.css">
<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/font-awesome/4.3.0/css/font-awesome.min.css">
<style>
body { width: 500px; }
i { padding: 3px; cursor: pointer; }
</style>
</head>
<body>
<div>
<table id="tips" class="table table-striped">
<thead>
  <th>ID</th>
  <th>Tip</th>
  <th>Votes</th>
</thead>
"#;

const PAGE_TAIL: &str = r#"</table>
</div>
<script>
async function castVote(id, up) {
  const response = await fetch("/vote", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ ID: id, Vote: up }),
  });
  if (!response.ok) {
    console.log("vote failed", response.status);
    return;
  }
  const vote = await response.json();
  const count = document.getElementById(String(vote.ID));
  count.textContent = parseInt(count.textContent, 10) + (vote.Vote ? 1 : -1);
}

document.querySelectorAll("[data-vote]").forEach(function (icon) {
  icon.addEventListener("click", function () {
    castVote(parseInt(icon.dataset.tip, 10), icon.dataset.vote === "up");
  });
});
</script>
</body>
</html>
"#;

pub fn render_tips(tips: &[RankedTip]) -> Result<String> {
    let mut page = String::from(PAGE_HEAD);

    for tip in tips {
        write!(
            page,
            r#"<tr>
   <td>{id}</td>
   <td>{text}</td>
   <td><i data-tip="{id}" data-vote="up" class="fa fa-thumbs-o-up"></i><span id="{id}">{score}</span><i data-tip="{id}" data-vote="down" class="fa fa-thumbs-o-down"></i></td>
</tr>
"#,
            id = tip.id,
            text = escape_html(&tip.text),
            score = tip.score,
        )
        .map_err(|e| AppError::EncodingFailure(format!("cannot render tip {}: {e}", tip.id)))?;
    }

    page.push_str(PAGE_TAIL);

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_in_ranked_order() {
        let tips = vec![
            RankedTip {
                id: 1,
                text: "Wear a hat".into(),
                score: 1,
            },
            RankedTip {
                id: 0,
                text: "Use a knife".into(),
                score: 0,
            },
        ];

        let page = render_tips(&tips).unwrap();
        let hat = page.find("Wear a hat").unwrap();
        let knife = page.find("Use a knife").unwrap();

        assert!(hat < knife);
        assert!(page.contains(r#"<span id="1">1</span>"#));
        assert!(page.contains(r#"<span id="0">0</span>"#));
    }

    #[test]
    fn test_tip_text_is_escaped() {
        let tips = vec![RankedTip {
            id: 0,
            text: "<script>alert(1)</script>".into(),
            score: -2,
        }];

        let page = render_tips(&tips).unwrap();
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains(r#"<span id="0">-2</span>"#));
    }

    #[test]
    fn test_empty_listing() {
        let page = render_tips(&[]).unwrap();
        assert!(page.contains("<table"));
        assert!(!page.contains("<tr>"));
    }
}
