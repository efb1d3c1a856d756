//! `GET /chart`: the justice agreement chart.
//!
//! An upper-triangular matrix of agreement rates, one row and one column per
//! justice, followed by a legend of full names.

use axum::{extract::State, response::Html};
use scoca_core::{chart::AgreementChart, store::OpinionStore};

use crate::{
  AppState,
  error::Error,
  html::{HtmlWriter, back_links, page},
};

const CHART_CSS: &str = "
#agreeTable { border: none; border-collapse: collapse; }
#agreeTable th, #agreeTable td {
  width: 6em; height: 3em; text-align: center; vertical-align: middle;
}
#agreeTable th { border: none; color: #222; }
#agreeTable td { border: solid 2px black; padding: 0; }
.low { background-color: #ff9d9d; }
.high { background-color: #b1efb1; }
#legendTable { border: none; border-collapse: collapse; }
#legendTable td { border: solid 1px #000; padding: 0.25em 0.5em; }
";

pub async fn handler<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let justices = state
    .store
    .list_justices()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let cases = state
    .store
    .list_chart_cases()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let chart = AgreementChart::build(justices, &cases);
  for id in &chart.skipped {
    tracing::warn!(
      opinion_id = *id,
      "opinion neither concurs nor dissents; left out of chart"
    );
  }

  Ok(page("Agreement Chart", Some(CHART_CSS), |w| {
    w.elem("h1", &[], "Agreement Chart");
    back_links(w, &[("/", "Back to Flagged Case Filings/Opinions")]);
    write_matrix(w, &chart);
    write_legend(w, &chart);
  }))
}

/// The CSS class for a cell: above 90% is high, below 10% is low.
fn rate_class(percent: u32) -> Option<&'static str> {
  match percent {
    91.. => Some("high"),
    0..10 => Some("low"),
    _ => None,
  }
}

fn write_matrix(w: &mut HtmlWriter, chart: &AgreementChart) {
  let justices = &chart.justices;
  w.start("table", &[("id", "agreeTable")]);

  w.start("tr", &[]).elem("th", &[], "");
  for j in justices.iter().skip(1) {
    w.elem("th", &[], &j.shorthand);
  }
  w.end("tr");

  for (col, left) in justices.iter().enumerate() {
    w.start("tr", &[]);
    if col > 0 {
      let colspan = col.to_string();
      w.elem("th", &[("colspan", colspan.as_str())], "");
    }
    w.elem("th", &[], &left.shorthand);
    for top in &justices[col + 1..] {
      match chart.counts(&left.shorthand, &top.shorthand).percent() {
        Some(percent) => {
          let attrs: Vec<(&str, &str)> =
            rate_class(percent).map(|c| ("class", c)).into_iter().collect();
          w.elem("td", &attrs, &format!("{percent}%"));
        }
        None => {
          w.elem("td", &[], "n/a");
        }
      }
    }
    w.end("tr");
  }

  w.end("table");
}

fn write_legend(w: &mut HtmlWriter, chart: &AgreementChart) {
  w.start("table", &[("id", "legendTable")]);
  for j in &chart.justices {
    w.start("tr", &[])
      .elem("td", &[], &j.shorthand)
      .elem("td", &[], &j.fullname)
      .end("tr");
  }
  w.end("table");
}
