use crate::error::Result;
use crate::reports::Aggregate;

/// Swatches shown next to each legend line; slice colors follow the same order.
const SWATCHES: [&str; 8] = ["🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫", "⬛"];

#[cfg_attr(not(feature = "charts"), allow(dead_code))]
const PALETTE: [(u8, u8, u8); 8] = [
    (220, 53, 69),
    (253, 126, 20),
    (255, 193, 7),
    (40, 167, 69),
    (0, 123, 255),
    (111, 66, 193),
    (121, 85, 72),
    (52, 58, 64),
];

#[cfg_attr(not(feature = "charts"), allow(dead_code))]
const WIDTH: u32 = 600;
#[cfg_attr(not(feature = "charts"), allow(dead_code))]
const HEIGHT: u32 = 600;

#[derive(Debug, Clone)]
pub struct Chart {
    pub png: Vec<u8>,
    pub legend: String,
}

/// Legend lines pairing each category with its slice color and share.
pub fn legend(agg: &Aggregate) -> String {
    agg.categories
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{} {}: {:.1}%",
                SWATCHES[i % SWATCHES.len()],
                item.category,
                agg.share(item)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pie chart of each category's share of the total. `None` when there is
/// nothing to divide (zero total) or charts are compiled out.
pub fn render_pie(agg: &Aggregate) -> Result<Option<Chart>> {
    if agg.total <= 0 {
        return Ok(None);
    }
    draw(agg)
}

#[cfg(not(feature = "charts"))]
fn draw(_agg: &Aggregate) -> Result<Option<Chart>> {
    Ok(None)
}

#[cfg(feature = "charts")]
fn draw(agg: &Aggregate) -> Result<Option<Chart>> {
    use std::f64::consts::PI;

    use plotters::prelude::*;

    use crate::error::AppError;

    let file = tempfile::Builder::new().suffix(".png").tempfile()?;
    let path = file.path().to_path_buf();

    {
        let root = BitMapBackend::new(&path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| AppError::Chart(e.to_string()))?;

        let cx = f64::from(WIDTH) / 2.0;
        let cy = f64::from(HEIGHT) / 2.0;
        let radius = f64::from(WIDTH.min(HEIGHT)) * 0.45;

        // Start at twelve o'clock, go clockwise.
        let mut start = -PI / 2.0;
        for (i, item) in agg.categories.iter().enumerate() {
            if item.total <= 0 {
                continue;
            }
            let sweep = 2.0 * PI * item.total as f64 / agg.total as f64;
            let steps = ((sweep.to_degrees().ceil() as usize) * 2).max(2);

            let mut points = Vec::with_capacity(steps + 2);
            points.push((cx as i32, cy as i32));
            for s in 0..=steps {
                let angle = start + sweep * s as f64 / steps as f64;
                points.push((
                    (cx + radius * angle.cos()).round() as i32,
                    (cy + radius * angle.sin()).round() as i32,
                ));
            }

            let (r, g, b) = PALETTE[i % PALETTE.len()];
            root.draw(&Polygon::new(points, RGBColor(r, g, b).filled()))
                .map_err(|e| AppError::Chart(e.to_string()))?;
            start += sweep;
        }

        root.present().map_err(|e| AppError::Chart(e.to_string()))?;
    }

    let png = std::fs::read(&path)?;
    Ok(Some(Chart {
        png,
        legend: legend(agg),
    }))
}
