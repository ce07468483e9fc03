//! SVG serialization of chart scenes.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::scene::{fmt_num, Element, Paint, Scene, TextAlign};
use super::ChartError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Serialize `scene` as a standalone SVG document
pub fn to_svg(scene: &Scene) -> Result<String, ChartError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NS));
    root.push_attribute(("width", fmt_num(scene.width).as_str()));
    root.push_attribute(("height", fmt_num(scene.height).as_str()));
    root.push_attribute((
        "viewBox",
        format!("0 0 {} {}", fmt_num(scene.width), fmt_num(scene.height)).as_str(),
    ));
    writer.write_event(Event::Start(root))?;

    write_defs(&mut writer, scene)?;

    let mut background = BytesStart::new("rect");
    background.push_attribute(("width", "100%"));
    background.push_attribute(("height", "100%"));
    background.push_attribute(("fill", scene.background.to_hex().as_str()));
    writer.write_event(Event::Empty(background))?;

    if !scene.plot.is_empty() {
        let mut group = BytesStart::new("g");
        group.push_attribute(("class", "plot"));
        group.push_attribute(("clip-path", format!("url(#{})", clip_id(scene)).as_str()));
        writer.write_event(Event::Start(group))?;
        for element in &scene.plot {
            write_element(&mut writer, scene, element)?;
        }
        writer.write_event(Event::End(BytesEnd::new("g")))?;
    }

    if !scene.overlay.is_empty() {
        let mut group = BytesStart::new("g");
        group.push_attribute(("class", "axes"));
        group.push_attribute(("font-family", "sans-serif"));
        writer.write_event(Event::Start(group))?;
        for element in &scene.overlay {
            write_element(&mut writer, scene, element)?;
        }
        writer.write_event(Event::End(BytesEnd::new("g")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("svg")))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| ChartError::Encoding(e.to_string()))
}

fn clip_id(scene: &Scene) -> String {
    format!("plot-clip-{}", scene.id)
}

fn gradient_id(scene: &Scene) -> String {
    format!("line-gradient-{}", scene.id)
}

fn write_defs(writer: &mut Writer<Cursor<Vec<u8>>>, scene: &Scene) -> Result<(), ChartError> {
    if scene.plot.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("defs")))?;

    let mut clip = BytesStart::new("clipPath");
    clip.push_attribute(("id", clip_id(scene).as_str()));
    writer.write_event(Event::Start(clip))?;
    let mut rect = BytesStart::new("rect");
    rect.push_attribute(("x", fmt_num(scene.clip.x).as_str()));
    rect.push_attribute(("y", fmt_num(scene.clip.y).as_str()));
    rect.push_attribute(("width", fmt_num(scene.clip.width).as_str()));
    rect.push_attribute(("height", fmt_num(scene.clip.height).as_str()));
    writer.write_event(Event::Empty(rect))?;
    writer.write_event(Event::End(BytesEnd::new("clipPath")))?;

    let gradient = scene.plot.iter().find_map(|e| match e {
        Element::Path {
            fill: Some(paint @ Paint::VerticalGradient { .. }),
            ..
        } => Some(*paint),
        _ => None,
    });
    if let Some(Paint::VerticalGradient {
        color,
        y_bottom,
        y_top,
        bottom_opacity,
        top_opacity,
    }) = gradient
    {
        let mut grad = BytesStart::new("linearGradient");
        grad.push_attribute(("id", gradient_id(scene).as_str()));
        grad.push_attribute(("gradientUnits", "userSpaceOnUse"));
        grad.push_attribute(("x1", "0"));
        grad.push_attribute(("y1", fmt_num(y_bottom).as_str()));
        grad.push_attribute(("x2", "0"));
        grad.push_attribute(("y2", fmt_num(y_top).as_str()));
        writer.write_event(Event::Start(grad))?;
        for (offset, opacity) in [("0%", bottom_opacity), ("100%", top_opacity)] {
            let mut stop = BytesStart::new("stop");
            stop.push_attribute(("offset", offset));
            stop.push_attribute(("stop-color", color.to_hex().as_str()));
            stop.push_attribute(("stop-opacity", fmt_num(opacity).as_str()));
            writer.write_event(Event::Empty(stop))?;
        }
        writer.write_event(Event::End(BytesEnd::new("linearGradient")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("defs")))?;
    Ok(())
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    scene: &Scene,
    element: &Element,
) -> Result<(), ChartError> {
    match element {
        Element::Path { path, fill, stroke } => {
            let mut tag = BytesStart::new("path");
            tag.push_attribute(("d", path.to_svg_data().as_str()));
            let fill = match fill {
                Some(Paint::Solid(color)) => color.to_hex(),
                Some(Paint::VerticalGradient { .. }) => format!("url(#{})", gradient_id(scene)),
                None => "none".to_string(),
            };
            tag.push_attribute(("fill", fill.as_str()));
            if let Some(stroke) = stroke {
                tag.push_attribute(("stroke", stroke.color.to_hex().as_str()));
                tag.push_attribute(("stroke-width", fmt_num(stroke.width).as_str()));
            }
            writer.write_event(Event::Empty(tag))?;
        }
        Element::Line { from, to, stroke } => {
            let mut tag = BytesStart::new("line");
            tag.push_attribute(("x1", fmt_num(from.x).as_str()));
            tag.push_attribute(("y1", fmt_num(from.y).as_str()));
            tag.push_attribute(("x2", fmt_num(to.x).as_str()));
            tag.push_attribute(("y2", fmt_num(to.y).as_str()));
            tag.push_attribute(("stroke", stroke.color.to_hex().as_str()));
            tag.push_attribute(("stroke-width", fmt_num(stroke.width).as_str()));
            writer.write_event(Event::Empty(tag))?;
        }
        Element::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let mut tag = BytesStart::new("circle");
            tag.push_attribute(("cx", fmt_num(center.x).as_str()));
            tag.push_attribute(("cy", fmt_num(center.y).as_str()));
            tag.push_attribute(("r", fmt_num(*radius).as_str()));
            tag.push_attribute(("fill", fill.to_hex().as_str()));
            if let Some(stroke) = stroke {
                tag.push_attribute(("stroke", stroke.color.to_hex().as_str()));
                tag.push_attribute(("stroke-width", fmt_num(stroke.width).as_str()));
            }
            writer.write_event(Event::Empty(tag))?;
        }
        Element::Text {
            anchor,
            text,
            size,
            color,
            align,
        } => {
            let mut tag = BytesStart::new("text");
            tag.push_attribute(("x", fmt_num(anchor.x).as_str()));
            tag.push_attribute(("y", fmt_num(anchor.y).as_str()));
            tag.push_attribute(("font-size", fmt_num(*size).as_str()));
            tag.push_attribute(("fill", color.to_hex().as_str()));
            let anchor = match align {
                TextAlign::Start => "start",
                TextAlign::Middle => "middle",
                TextAlign::End => "end",
            };
            tag.push_attribute(("text-anchor", anchor));
            writer.write_event(Event::Start(tag))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new("text")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::config::ChartConfig;
    use crate::chart::render::{ChartSurface, SeriesRenderer};
    use crate::sample::{Metric, Sample};
    use chrono::{Duration, Utc};

    #[test]
    fn test_blank_surface_svg() {
        let surface = ChartSurface::new(ChartConfig::standard(Metric::Gsr));
        let svg = surface.to_svg().unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"500\" height=\"300\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_rendered_svg_structure() {
        let t0 = Utc::now();
        let samples: Vec<Sample> = (0..30)
            .map(|i| Sample::new(75.0, 12.0 + (i % 3) as f64, 15.0, t0 + Duration::seconds(i)))
            .collect();
        let renderer = SeriesRenderer::default();
        let mut surface = ChartSurface::new(ChartConfig::standard(Metric::Gsr));
        renderer.render(&samples, &mut surface).unwrap();

        let svg = surface.to_svg().unwrap();
        assert!(svg.contains("id=\"line-gradient-gsr\""));
        assert!(svg.contains("clip-path=\"url(#plot-clip-gsr)\""));
        assert!(svg.contains("stroke=\"#4ecdc4\""));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(!svg.contains("NaN"));
    }
}
