//! SVG rendering for SIP growth and price history charts.

use crate::domain::quote::PricePoint;
use crate::domain::sip::YearPoint;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 280.0;
const PADDING: f64 = 48.0;

const INVESTED_FILL: &str = "#d4d9ff";
const INVESTED_STROKE: &str = "#5367ff";
const PROJECTED_FILL: &str = "#b3f5e9";
const PROJECTED_STROKE: &str = "#00d09c";

/// Axis label in Indian numbering: crore, lakh, thousand.
pub fn format_inr_compact(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("₹{:.1}Cr", value / 10_000_000.0)
    } else if value >= 100_000.0 {
        format!("₹{:.1}L", value / 100_000.0)
    } else if value >= 1_000.0 {
        format!("₹{:.0}K", value / 1_000.0)
    } else {
        format!("₹{:.0}", value)
    }
}

/// Whole rupees with thousands separators: "₹1,161,695".
pub fn format_inr(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_open(title: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">
<title>{title}</title>
<rect width="100%" height="100%" fill="#ffffff"/>
<line x1="{PADDING:.0}" y1="{top:.0}" x2="{PADDING:.0}" y2="{bottom:.0}" stroke="#e4e7f5"/>
<line x1="{PADDING:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="#e4e7f5"/>
"##,
        title = escape_xml(title),
        top = PADDING,
        bottom = HEIGHT - PADDING,
        right = WIDTH - PADDING,
    )
}

/// Grouped bars per year: invested beside projected value.
pub fn sip_growth_svg(series: &[YearPoint]) -> String {
    if series.is_empty() {
        return "No yearly data available.".to_string();
    }

    let max_value = series
        .iter()
        .map(|p| p.projected_value.max(p.invested))
        .fold(0.0_f64, f64::max);
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let scale_y = if max_value > 0.0 {
        plot_height / max_value
    } else {
        0.0
    };
    let slot = plot_width / series.len() as f64;
    let bar = slot * 0.38;
    let baseline = HEIGHT - PADDING;

    let mut svg = svg_open("Growth Visualization");
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">{}</text>\n",
        PADDING - 4.0,
        PADDING + 4.0,
        format_inr_compact(max_value)
    ));

    for (i, point) in series.iter().enumerate() {
        let center = PADDING + slot * (i as f64 + 0.5);
        let invested_h = point.invested * scale_y;
        let projected_h = point.projected_value * scale_y;
        svg.push_str(&format!(
            "<rect class=\"invested\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{INVESTED_FILL}\" stroke=\"{INVESTED_STROKE}\"/>\n",
            center - bar,
            baseline - invested_h,
            bar,
            invested_h
        ));
        svg.push_str(&format!(
            "<rect class=\"projected\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{PROJECTED_FILL}\" stroke=\"{PROJECTED_STROKE}\"/>\n",
            center,
            baseline - projected_h,
            bar,
            projected_h
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"middle\">{}Y</text>\n",
            center,
            baseline + 14.0,
            point.year
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Close-price polyline, oldest on the left.
pub fn price_line_svg(title: &str, points: &[PricePoint]) -> String {
    if points.is_empty() {
        return "No price data available.".to_string();
    }

    let min_close = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max_close = points
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max_close - min_close;
    let scale_y = if range > 0.0 {
        plot_height / range
    } else {
        1.0
    };
    let scale_x = if points.len() > 1 {
        plot_width / (points.len() - 1) as f64
    } else {
        0.0
    };

    let polyline: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (p.close - min_close) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect();

    let mut svg = svg_open(title);
    svg.push_str(&format!(
        "<polyline fill=\"none\" stroke=\"{INVESTED_STROKE}\" stroke-width=\"2\" points=\"{}\"/>\n",
        polyline.join(" ")
    ));
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{}</text>\n",
            PADDING,
            HEIGHT - PADDING + 14.0,
            first.date.format("%b %d")
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">{}</text>\n",
            WIDTH - PADDING,
            HEIGHT - PADDING + 14.0,
            last.date.format("%b %d")
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn year(year: u32, invested: f64, projected_value: f64) -> YearPoint {
        YearPoint {
            year,
            invested,
            projected_value,
        }
    }

    fn price(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close,
        }
    }

    #[test]
    fn compact_inr_labels() {
        assert_eq!(format_inr_compact(25_000_000.0), "₹2.5Cr");
        assert_eq!(format_inr_compact(1_161_695.0), "₹11.6L");
        assert_eq!(format_inr_compact(60_000.0), "₹60K");
        assert_eq!(format_inr_compact(500.0), "₹500");
    }

    #[test]
    fn grouped_inr_amounts() {
        assert_eq!(format_inr(1_161_695.4), "₹1,161,695");
        assert_eq!(format_inr(600_000.0), "₹600,000");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(-1_500.0), "-₹1,500");
    }

    #[test]
    fn empty_series_message() {
        assert_eq!(sip_growth_svg(&[]), "No yearly data available.");
        assert_eq!(price_line_svg("S&P 500", &[]), "No price data available.");
    }

    #[test]
    fn growth_chart_has_two_bars_per_year() {
        let svg = sip_growth_svg(&[
            year(1, 60_000.0, 64_047.0),
            year(2, 120_000.0, 136_216.0),
            year(3, 180_000.0, 217_538.0),
        ]);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("class=\"invested\"").count(), 3);
        assert_eq!(svg.matches("class=\"projected\"").count(), 3);
        assert!(svg.contains(">3Y</text>"));
        assert!(svg.contains("₹2.2L"));
    }

    #[test]
    fn price_chart_draws_polyline() {
        let svg = price_line_svg(
            "S&P 500",
            &[
                price("2024-03-01", 5100.0),
                price("2024-03-04", 5130.0),
                price("2024-03-05", 5078.0),
            ],
        );
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<title>S&amp;P 500</title>"));
        assert!(svg.contains("Mar 01"));
        assert!(svg.contains("Mar 05"));
    }

    #[test]
    fn flat_prices_do_not_divide_by_zero() {
        let svg = price_line_svg("Flat", &[price("2024-03-01", 10.0), price("2024-03-04", 10.0)]);
        assert!(!svg.contains("NaN"));
    }
}
