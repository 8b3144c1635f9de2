//! Highcharts HTML document rendering.
//!
//! The report is a self-contained page: five chart divs (plus the optional
//! rates scatter) with their series embedded as JSON. Series payloads are
//! serialized up front and injected into the template verbatim.

use anyhow::Result;
use minijinja::{context, Environment};

use super::ChartDocument;

const TEMPLATE: &str = r#"<!DOCTYPE HTML>
<html>
    <head>
        <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
        <title>MIG - {{ title }}</title>
        <script type="text/javascript" src="https://code.jquery.com/jquery-1.8.2.min.js"></script>
        <script type="text/javascript">
$(function () {
    {% if with_rate_chart %}$('#rate').highcharts({
        chart: { zoomType: 'xy' },
        title: { text: 'Receiving vs Sending' },
        xAxis: { title: { text: 'Sending, QpS' } },
        yAxis: {
            title: { text: 'Receiving, QpS' },
            plotLines: [{ value: 0, width: 1, color: '#808080' }]
        },
        legend: { align: 'right', verticalAlign: 'middle', layout: 'vertical' },
        credits: { enabled: false },
        series: [{{ rate_reference }}, {{ rate_receiving }}]
    });

    {% endif %}$('#counts').highcharts({
        chart: { zoomType: 'xy' },
        title: { text: 'Messages' },
        xAxis: { title: { text: 'time, ms' } },
        yAxis: {
            title: { text: 'count' },
            plotLines: [{ value: 0, width: 1, color: '#808080' }]
        },
        legend: { align: 'right', verticalAlign: 'middle', layout: 'vertical' },
        credits: { enabled: false },
        series: {{ counts }}
    });

    $('#rates').highcharts({
        chart: { zoomType: 'xy' },
        title: { text: 'Rates' },
        xAxis: { title: { text: 'time, ms' } },
        yAxis: {
            title: { text: 'rate, QpS' },
            plotLines: [{ value: 0, width: 1, color: '#808080' }]
        },
        legend: { align: 'right', verticalAlign: 'middle', layout: 'vertical' },
        credits: { enabled: false },
        series: {{ rates }}
    });

    $('#processing').highcharts({
        chart: { zoomType: 'xy' },
        title: { text: 'Processing' },
        xAxis: {
            type: 'logarithmic',
            minorTickInterval: 0.1,
            title: { text: 'delay, ms' }
        },
        yAxis: {
            title: { text: 'count' },
            plotLines: [{ value: 0, width: 1, color: '#808080' }]
        },
        legend: { align: 'right', verticalAlign: 'middle', layout: 'vertical' },
        credits: { enabled: false },
        series: {{ processing }}
    });

    $('#queue').highcharts({
        chart: { zoomType: 'xy' },
        title: { text: 'Queue' },
        xAxis: { title: { text: 'time, ms' } },
        yAxis: {
            title: { text: 'count' },
            plotLines: [{ value: 0, width: 1, color: '#808080' }]
        },
        legend: { align: 'right', verticalAlign: 'middle', layout: 'vertical' },
        credits: { enabled: false },
        series: {{ queue }}
    });

    $('#processing_steps').highcharts({
        chart: { zoomType: 'xy' },
        title: { text: 'Processing Spread' },
        xAxis: {
            type: 'logarithmic',
            minorTickInterval: 0.1,
            title: { text: 'delay, ms' }
        },
        yAxis: {
            type: 'logarithmic',
            minorTickInterval: 0.1,
            title: { text: 'interval, us' },
            plotLines: [{ value: 0, width: 1, color: '#808080' }]
        },
        legend: { align: 'right', verticalAlign: 'middle', layout: 'vertical' },
        credits: { enabled: false },
        series: {{ processing_steps }}
    });
});
        </script>
    </head>
    <body>
        <script type="text/javascript" src="https://code.highcharts.com/highcharts.js"></script>
        {% if with_rate_chart %}<div id="rate" style="min-width: 310px; height: 700px; margin: 0 auto"></div>
        {% endif %}<div id="counts" style="min-width: 310px; height: 700px; margin: 0 auto"></div>
        <div id="rates" style="min-width: 310px; height: 700px; margin: 0 auto"></div>
        <div id="processing" style="min-width: 310px; height: 700px; margin: 0 auto"></div>
        <div id="queue" style="min-width: 310px; height: 700px; margin: 0 auto"></div>
        <div id="processing_steps" style="min-width: 310px; height: 700px; margin: 0 auto"></div>
    </body>
</html>
"#;

/// Render the document into a self-contained HTML page.
pub fn render(document: &ChartDocument) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("report", TEMPLATE)?;
    let template = env.get_template("report")?;

    let (rate_reference, rate_receiving) = match &document.rate_chart {
        Some(chart) => {
            let (reference, receiving) = chart.clone().into_series(&document.title);
            (to_json(&reference)?, to_json(&receiving)?)
        }
        None => (String::new(), String::new()),
    };

    let html = template.render(context! {
        title => &document.title,
        with_rate_chart => document.rate_chart.is_some(),
        rate_reference => rate_reference,
        rate_receiving => rate_receiving,
        counts => to_json(&document.counts)?,
        rates => to_json(&document.rates)?,
        processing => to_json(&document.processing)?,
        processing_steps => to_json(&document.processing_spreads)?,
        queue => to_json(&document.queue)?,
    })?;
    Ok(html)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
