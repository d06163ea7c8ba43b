//!
//! # SVG Preview Rendering
//!
//! Renders a cell and its dependencies as SVG, keeping the hierarchy:
//! each cell is defined once as a `<g>` group, and references become `<use>` elements.
//! Layout space is y-up, so the top cell is drawn through a y-flipping scale.
//!

// Std-Lib
use std::collections::BTreeSet;
use std::fmt::Write;

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::bbox::BoundBox;
use crate::error::StoreResult;
use crate::geom::{Layer, Point};
use crate::store::{CellKey, Library};

/// Fill colours, cycled through by (layer, datatype)
const PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

/// # SVG Rendering Options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SvgOptions {
    /// Output pixels per layout unit
    pub scaling: f64,
    /// Margin around the drawing, in output pixels
    pub padding: f64,
    /// Background fill colour, if any
    pub background: Option<String>,
}
impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            scaling: 10.0,
            padding: 5.0,
            background: Some("#222222".into()),
        }
    }
}

/// # SVG Renderer
pub struct SvgRenderer<'lib> {
    lib: &'lib Library,
    opts: &'lib SvgOptions,
    out: String,
}
impl<'lib> SvgRenderer<'lib> {
    /// Render cell `top` of `lib` to an SVG document
    pub fn render(lib: &'lib Library, top: CellKey, opts: &'lib SvgOptions) -> StoreResult<String> {
        let mut this = Self {
            lib,
            opts,
            out: String::new(),
        };
        this.render_doc(top)?;
        Ok(this.out)
    }
    fn render_doc(&mut self, top: CellKey) -> StoreResult<()> {
        let order = self.lib.dep_order(top)?;
        let mut bbox = self.lib.bbox(top)?;
        if bbox.is_empty() {
            bbox = BoundBox::from_points(&Point::default(), &Point::default());
        }
        let (s, pad) = (self.opts.scaling, self.opts.padding);
        let size = bbox.size();
        let (x, y) = (bbox.p0.x * s - pad, -bbox.p1.y * s - pad);
        let (w, h) = (size.width * s + 2.0 * pad, size.height * s + 2.0 * pad);

        writeln!(self.out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            w, h, x, y, w, h
        )?;
        writeln!(self.out, "<defs>")?;
        self.render_styles(&order)?;
        for key in order.iter() {
            self.render_cell(*key)?;
        }
        writeln!(self.out, "</defs>")?;
        if let Some(bg) = &self.opts.background {
            writeln!(
                self.out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="none"/>"#,
                x,
                y,
                w,
                h,
                escape(bg)
            )?;
        }
        writeln!(
            self.out,
            r##"<use transform="scale({} {})" xlink:href="#{}"/>"##,
            s,
            -s,
            cell_id(&self.lib.cell(top)?.name)
        )?;
        writeln!(self.out, "</svg>")?;
        Ok(())
    }
    /// One CSS class per (layer, datatype) in use
    fn render_styles(&mut self, order: &[CellKey]) -> StoreResult<()> {
        let mut layers = BTreeSet::new();
        for key in order.iter() {
            layers.extend(self.lib.cell(*key)?.shapes.iter().map(|s| s.layer));
        }
        writeln!(self.out, r#"<style type="text/css">"#)?;
        for layer in layers.iter() {
            let color = layer_color(layer);
            writeln!(
                self.out,
                ".{} {{stroke: {}; fill: {}; fill-opacity: 0.5;}}",
                layer_class(layer),
                color,
                color
            )?;
        }
        writeln!(self.out, "</style>")?;
        Ok(())
    }
    fn render_cell(&mut self, key: CellKey) -> StoreResult<()> {
        let lib = self.lib;
        let cell = lib.cell(key)?;
        writeln!(self.out, r#"<g id="{}">"#, cell_id(&cell.name))?;
        for shape in cell.shapes.iter() {
            let (p0, p1) = (&shape.rect.p0, &shape.rect.p1);
            writeln!(
                self.out,
                r#"<polygon class="{}" points="{},{} {},{} {},{} {},{}"/>"#,
                layer_class(&shape.layer),
                p0.x,
                p0.y,
                p1.x,
                p0.y,
                p1.x,
                p1.y,
                p0.x,
                p1.y
            )?;
        }
        for r in cell.refs.iter() {
            writeln!(
                self.out,
                r##"<use transform="translate({} {})" xlink:href="#{}"/>"##,
                r.loc.x,
                r.loc.y,
                cell_id(&lib.cell(r.cell)?.name)
            )?;
        }
        writeln!(self.out, "</g>")?;
        Ok(())
    }
}

fn layer_class(layer: &Layer) -> String {
    format!("l{}d{}", layer.layer, layer.datatype)
}
fn layer_color(layer: &Layer) -> &'static str {
    let idx = (layer.layer as i64 * 3 + layer.datatype as i64).rem_euclid(PALETTE.len() as i64);
    PALETTE[idx as usize]
}
/// Convert a cell name to a valid XML id
fn cell_id(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' => c,
            _ => '_',
        })
        .collect()
}
/// Escape XML attribute text
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
