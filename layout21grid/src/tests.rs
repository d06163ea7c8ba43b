//!
//! # layout21grid unit tests
//!

// Std-Lib
use std::collections::HashSet;
use std::path::Path;

// Crates.io
use proptest::prelude::*;

// Local Imports
use crate::*;

/// Shorthand for a valid [LevelDescriptor]
fn desc(rows: usize, columns: usize, spacing: f64) -> LevelDescriptor {
    LevelDescriptor::new(rows, columns, spacing).unwrap()
}
/// Build the default hierarchy into a fresh [Library]
fn default_build() -> GridResult<(Library, Hierarchy<CellKey>)> {
    let builder = HierarchyBuilder::from_overrides(None)?;
    let mut lib = builder.library();
    let hier = builder.build(&mut lib)?;
    Ok((lib, hier))
}
/// The custom configuration: 3x3, 2x3 and 2x2 grids
fn custom_overrides() -> ConfigOverride {
    ConfigOverride::default()
        .with_element_size(5.0)
        .with_level(Level::SubContainer, LevelOverride::new(3, 3, 10.0))
        .with_level(Level::Container, LevelOverride::new(2, 3, 60.0))
        .with_level(Level::Top, LevelOverride::new(2, 2, 200.0))
}
/// Sorted (x, y) origins of the references in `cell`
fn origins(lib: &Library, cell: CellKey) -> Vec<(f64, f64)> {
    let mut rv: Vec<(f64, f64)> = lib
        .cell(cell)
        .unwrap()
        .refs
        .iter()
        .map(|r| (r.loc.x, r.loc.y))
        .collect();
    rv.sort_by(|a, b| a.partial_cmp(b).unwrap());
    rv
}

#[test]
fn level_descriptors() -> GridResult<()> {
    let d = LevelDescriptor::new(3, 4, 2.5)?;
    assert_eq!((d.rows(), d.columns(), d.spacing()), (3, 4, 2.5));
    assert_eq!(d.total_elements(), 12);
    assert_eq!(d, desc(3, 4, 2.5));
    assert_ne!(d, desc(4, 3, 2.5));

    for (r, c, s) in [(0, 2, 1.0), (2, 0, 1.0), (2, 2, -1.0), (2, 2, f64::NAN), (2, 2, f64::INFINITY)] {
        assert!(matches!(
            LevelDescriptor::new(r, c, s),
            Err(GridError::InvalidConfiguration(_))
        ));
    }
    // Zero spacing is fine
    LevelDescriptor::new(1, 1, 0.0)?;
    Ok(())
}
#[test]
fn levels() {
    let names: Vec<_> = Level::ALL.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["element", "sub_container", "container", "top"]);
    assert_eq!(Level::Element.child(), None);
    assert_eq!(Level::Top.child(), Some(Level::Container));
    for (idx, level) in Level::ALL.iter().enumerate() {
        assert_eq!(level.index(), idx);
    }
}
#[test]
fn extents() -> GridResult<()> {
    // Sub-container over the five-unit element
    assert_eq!(compute_extent(&desc(2, 2, 10.0), 5.0, 5.0)?, (20.0, 20.0));
    // Container over the sub-container
    assert_eq!(compute_extent(&desc(2, 2, 25.0), 20.0, 20.0)?, (65.0, 65.0));
    // Top over the container
    assert_eq!(compute_extent(&desc(2, 2, 50.0), 65.0, 65.0)?, (180.0, 180.0));
    // Rows and columns are independent
    assert_eq!(compute_extent(&desc(2, 3, 60.0), 35.0, 35.0)?, (225.0, 130.0));
    // Zero-size children leave only the gaps
    assert_eq!(compute_extent(&desc(3, 4, 2.0), 0.0, 0.0)?, (6.0, 4.0));
    // Typed wrapper agrees
    assert_eq!(
        grid_extent(&desc(2, 2, 10.0), &Extent::square(5.0))?,
        Extent::new(20.0, 20.0)
    );
    Ok(())
}
#[test]
fn invalid_child_extents() {
    for (w, h) in [(-1.0, 5.0), (5.0, -0.5), (f64::NAN, 1.0)] {
        assert!(matches!(
            compute_extent(&desc(2, 2, 1.0), w, h),
            Err(GridError::InvalidConfiguration(_))
        ));
    }
}
#[test]
fn origins_are_row_major() {
    let pts: Vec<_> = grid_origins(&desc(2, 3, 1.0), 4.0, 9.0)
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(
        pts,
        vec![
            (0.0, 0.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (5.0, 10.0),
            (10.0, 10.0)
        ]
    );
}
#[test]
fn place_top_grid() -> GridResult<()> {
    let mut lib = Library::new("place");
    let child = lib.new_cell("container")?;
    let top = lib.new_cell("top")?;
    let n = place_grid(&desc(2, 2, 50.0), child, top, 65.0, 65.0, &mut lib)?;
    assert_eq!(n, 4);
    assert_eq!(
        origins(&lib, top),
        vec![(0.0, 0.0), (0.0, 115.0), (115.0, 0.0), (115.0, 115.0)]
    );
    // Only the target is modified
    assert!(lib.cell(child)?.refs.is_empty());
    Ok(())
}
#[test]
fn place_invalid_makes_no_placements() -> GridResult<()> {
    let mut lib = Library::new("place");
    let child = lib.new_cell("child")?;
    let target = lib.new_cell("target")?;
    let res = place_grid(&desc(2, 2, 1.0), child, target, -1.0, 1.0, &mut lib);
    assert!(matches!(res, Err(GridError::InvalidConfiguration(_))));
    assert!(lib.cell(target)?.refs.is_empty());
    Ok(())
}

/// [LayoutStore] recording its calls, and rejecting references past `limit`
#[derive(Default)]
struct RecordingStore {
    names: Vec<String>,
    refs: Vec<(usize, usize, Point)>,
    limit: Option<usize>,
}
impl LayoutStore for RecordingStore {
    type Handle = usize;
    fn new_cell(&mut self, name: &str) -> StoreResult<usize> {
        self.names.push(name.into());
        Ok(self.names.len() - 1)
    }
    fn add_shape(&mut self, _cell: usize, _shape: Shape) -> StoreResult<()> {
        Ok(())
    }
    fn add_array_reference(&mut self, parent: usize, child: usize, origin: Point) -> StoreResult<()> {
        if Some(self.refs.len()) == self.limit {
            return Err(StoreError::UnknownHandle(format!("{}", child)));
        }
        self.refs.push((parent, child, origin));
        Ok(())
    }
    fn export_layout(&self, _path: &Path) -> StoreResult<()> {
        Ok(())
    }
    fn render_preview(&self, _cell: usize, _path: &Path) -> StoreResult<()> {
        Ok(())
    }
}
#[test]
fn builds_into_any_store() -> GridResult<()> {
    let mut store = RecordingStore::default();
    let hier = HierarchyBuilder::from_overrides(None)?.build(&mut store)?;
    assert_eq!(store.names, vec!["element", "sub_container", "container", "top"]);
    assert_eq!(store.refs.len(), 12);
    assert_eq!(hier.top().cell, 3);
    // Each level references only the level below
    for (parent, child, _) in store.refs.iter() {
        assert_eq!(*parent, *child + 1);
    }
    Ok(())
}
#[test]
fn store_errors_propagate() -> GridResult<()> {
    let mut store = RecordingStore {
        limit: Some(5),
        ..Default::default()
    };
    let res = HierarchyBuilder::from_overrides(None)?.build(&mut store);
    assert!(matches!(
        res,
        Err(GridError::Store(StoreError::UnknownHandle(_)))
    ));
    assert_eq!(store.refs.len(), 5);
    Ok(())
}
#[test]
fn duplicate_cells() -> GridResult<()> {
    let mut lib = Library::new("dup");
    lib.new_cell("top")?;
    assert!(matches!(
        lib.new_cell("top"),
        Err(StoreError::DuplicateName(ref n)) if n == "top"
    ));
    // And a build into a library already holding a `top` fails the same way
    let res = HierarchyBuilder::from_overrides(None)?.build(&mut lib);
    assert!(matches!(
        res,
        Err(GridError::Store(StoreError::DuplicateName(_)))
    ));
    Ok(())
}
#[test]
fn unknown_handles() -> GridResult<()> {
    let mut lib = Library::new("unknown");
    let cell = lib.new_cell("cell")?;
    let bogus = CellKey::default();
    let sq = Shape::square(Layer::default(), 1.0);
    assert!(matches!(lib.add_shape(bogus, sq), Err(StoreError::UnknownHandle(_))));
    assert!(matches!(
        lib.add_array_reference(cell, bogus, Point::default()),
        Err(StoreError::UnknownHandle(_))
    ));
    assert!(matches!(
        lib.add_array_reference(bogus, cell, Point::default()),
        Err(StoreError::UnknownHandle(_))
    ));
    assert!(matches!(lib.to_svg(bogus), Err(StoreError::UnknownHandle(_))));
    assert!(matches!(lib.flat_count(bogus), Err(StoreError::UnknownHandle(_))));
    Ok(())
}
#[test]
fn cycles() -> GridResult<()> {
    let mut lib = Library::new("cycles");
    let a = lib.new_cell("a")?;
    let b = lib.new_cell("b")?;
    let c = lib.new_cell("c")?;
    assert!(matches!(
        lib.add_array_reference(a, a, Point::default()),
        Err(StoreError::Cycle(_, _))
    ));
    lib.add_array_reference(a, b, Point::default())?;
    lib.add_array_reference(b, c, Point::default())?;
    assert!(matches!(
        lib.add_array_reference(c, a, Point::default()),
        Err(StoreError::Cycle(ref p, ref ch)) if p == "c" && ch == "a"
    ));
    // Repeated, acyclic references are fine
    lib.add_array_reference(a, c, Point::new(1.0, 1.0))?;
    assert!(lib.contains(a, c));
    assert!(!lib.contains(c, a));
    Ok(())
}
#[test]
fn default_pipeline() -> GridResult<()> {
    let (lib, hier) = default_build()?;
    assert_eq!(lib.len(), 4);
    assert_eq!(
        lib.stats(),
        LibraryStats {
            cells: 4,
            shapes: 1,
            references: 12,
        }
    );
    let placements: Vec<_> = hier.levels().map(|l| l.placements).collect();
    assert_eq!(placements, vec![0, 4, 4, 4]);
    let extents: Vec<_> = hier.levels().map(|l| l.extent.as_tuple()).collect();
    assert_eq!(
        extents,
        vec![(5.0, 5.0), (20.0, 20.0), (65.0, 65.0), (180.0, 180.0)]
    );
    assert_eq!(lib.flat_count(hier.level(Level::Element).cell)?, 1);
    assert_eq!(lib.flat_count(hier.level(Level::Container).cell)?, 16);
    assert_eq!(lib.flat_count(hier.top().cell)?, 64);
    assert_eq!(
        origins(&lib, hier.top().cell),
        vec![(0.0, 0.0), (0.0, 115.0), (115.0, 0.0), (115.0, 115.0)]
    );
    // Cells are found by name, and each level's bounding box is its computed extent
    for built in hier.levels() {
        assert_eq!(lib.key(built.level.name()), Some(built.cell));
        let bbox = lib.bbox(built.cell)?;
        assert_eq!(bbox.p0, Point::new(0.0, 0.0));
        assert_eq!(bbox.size(), built.extent);
    }
    Ok(())
}
#[test]
fn custom_pipeline() -> GridResult<()> {
    let builder = HierarchyBuilder::from_overrides(Some(&custom_overrides()))?;
    let mut lib = builder.library();
    let hier = builder.build(&mut lib)?;
    assert_eq!(hier.level(Level::SubContainer).extent.as_tuple(), (35.0, 35.0));
    assert_eq!(hier.level(Level::Container).extent.as_tuple(), (225.0, 130.0));
    assert_eq!(hier.top().extent.as_tuple(), (650.0, 460.0));
    assert_eq!(lib.flat_count(hier.top().cell)?, 9 * 6 * 4);
    assert_eq!(lib.bbox(hier.top().cell)?.size(), hier.top().extent);
    Ok(())
}
#[test]
fn partial_overrides_merge_per_field() -> GridResult<()> {
    let ov = ConfigOverride {
        top: Some(LevelOverride {
            spacing: Some(0.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    let config = GridConfig::resolve(Some(&ov))?;
    assert_eq!(config.top, desc(2, 2, 0.0));
    assert_eq!(config.container, desc(2, 2, 25.0));
    assert_eq!(config.element.size(), 5.0);
    // An override without `size` keeps the default element
    let ov = ConfigOverride {
        element: Some(ElementOverride::default()),
        ..Default::default()
    };
    assert_eq!(GridConfig::resolve(Some(&ov))?.element.size(), 5.0);
    // Defaults are untouched by merging
    assert_eq!(GridConfig::defaults()?, GridConfig::resolve(None)?);
    Ok(())
}
#[test]
fn invalid_overrides() {
    let zero_rows = ConfigOverride::default().with_level(
        Level::Container,
        LevelOverride {
            rows: Some(0),
            ..Default::default()
        },
    );
    match GridConfig::resolve(Some(&zero_rows)) {
        Err(GridError::InvalidConfiguration(msg)) => assert!(msg.contains("container")),
        other => panic!("Expected InvalidConfiguration, got {:?}", other),
    }
    let negative = ConfigOverride::default().with_element_size(-5.0);
    assert!(matches!(
        HierarchyBuilder::from_overrides(Some(&negative)),
        Err(GridError::InvalidConfiguration(_))
    ));
    let bad_units = ConfigOverride {
        library: Some(LibraryOverride {
            precision: Some(0.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(GridConfig::resolve(Some(&bad_units)).is_err());
}
#[test]
fn parse_overrides() -> GridResult<()> {
    let yaml = r#"
        element:
          size: 5
        sub_container:
          rows: 3
          cols: 3
          spacing: 10
        container:
          rows: 2
          columns: 3
          spacing: 60
        top:
          rows: 2
          cols: 2
          spacing: 200
    "#;
    let from_yaml = ConfigOverride::parse(SerializationFormat::Yaml, yaml)?;
    assert_eq!(from_yaml, custom_overrides());

    let toml = r#"
        [top]
        spacing = 200.0

        [library]
        name = "grids"
    "#;
    let from_toml = ConfigOverride::parse(SerializationFormat::Toml, toml)?;
    let config = GridConfig::resolve(Some(&from_toml))?;
    assert_eq!(config.top, desc(2, 2, 200.0));
    assert_eq!(config.library.name, "grids");

    let json = r#"{"sub_container": {"rows": 1, "cols": 4}}"#;
    let from_json = ConfigOverride::parse(SerializationFormat::Json, json)?;
    assert_eq!(GridConfig::resolve(Some(&from_json))?.sub_container, desc(1, 4, 10.0));

    // Unknown levels and fields are rejected
    assert!(ConfigOverride::parse(SerializationFormat::Json, r#"{"bottom": {}}"#).is_err());
    assert!(ConfigOverride::parse(SerializationFormat::Json, r#"{"top": {"pitch": 1}}"#).is_err());
    // As are negative counts
    assert!(ConfigOverride::parse(SerializationFormat::Json, r#"{"top": {"rows": -1}}"#).is_err());
    Ok(())
}
#[test]
fn open_override_files() -> GridResult<()> {
    let dir = tempfile::tempdir().map_err(|e| GridError::Boxed(Box::new(e)))?;
    let ov = custom_overrides();
    for (fname, fmt) in [
        ("config.json", SerializationFormat::Json),
        ("config.yml", SerializationFormat::Yaml),
        ("config.toml", SerializationFormat::Toml),
    ] {
        let path = dir.path().join(fname);
        assert_eq!(SerializationFormat::from_path(&path)?, fmt);
        std::fs::write(&path, fmt.to_string(&ov)?).map_err(|e| GridError::Boxed(Box::new(e)))?;
        assert_eq!(ConfigOverride::open(&path)?, ov);
    }
    assert!(ConfigOverride::open(dir.path().join("config.txt")).is_err());
    assert!(ConfigOverride::open(dir.path().join("missing.yaml")).is_err());
    Ok(())
}
#[test]
fn gds_conversion() -> GridResult<()> {
    let (lib, _) = default_build()?;
    let gds = lib.to_gds()?;
    assert_eq!(gds.name, "library");
    let names: Vec<_> = gds.structs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["element", "sub_container", "container", "top"]);
    assert_eq!(
        gds.stats(),
        gds21::GdsStats {
            libraries: 1,
            structs: 4,
            boundaries: 1,
            struct_refs: 12,
        }
    );
    // Micron layout units, nanometre database units
    assert_eq!(
        gds.structs[0].elems[0],
        gds21::GdsElement::from(gds21::GdsBoundary::rect(
            0,
            0,
            gds21::GdsPoint::new(0, 0),
            gds21::GdsPoint::new(5000, 5000)
        ))
    );
    assert_eq!(
        gds.structs[3].elems[3],
        gds21::GdsElement::from(gds21::GdsStructRef {
            name: "container".into(),
            xy: gds21::GdsPoint::new(115_000, 115_000),
        })
    );
    Ok(())
}
#[test]
fn gds_overflow() -> GridResult<()> {
    // Ten million microns is beyond 32-bit nanometres
    let ov = ConfigOverride::default().with_level(Level::Top, LevelOverride::new(1, 2, 1e7));
    let builder = HierarchyBuilder::from_overrides(Some(&ov))?;
    let mut lib = builder.library();
    builder.build(&mut lib)?;
    assert!(matches!(lib.to_gds(), Err(StoreError::Export(_))));
    Ok(())
}
#[test]
fn svg_preview() -> GridResult<()> {
    let (lib, hier) = default_build()?;
    let svg = lib.to_svg(hier.top().cell)?;
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"viewBox="-5 -1805 1810 1810""#));
    assert!(svg.contains(r#"<g id="element">"#));
    assert!(svg.contains(r#"<polygon class="l0d0" points="0,0 5,0 5,5 0,5"/>"#));
    assert!(svg.contains(r##"<use transform="translate(115 115)" xlink:href="#container"/>"##));
    assert!(svg.contains(r##"<use transform="scale(10 -10)" xlink:href="#top"/>"##));
    // Children are defined before their parents
    let pos = |s: &str| svg.find(s).unwrap();
    assert!(pos(r#"<g id="element">"#) < pos(r#"<g id="sub_container">"#));
    assert!(pos(r#"<g id="container">"#) < pos(r#"<g id="top">"#));
    // Previews of lower levels leave out the cells above them
    let sub = lib.to_svg(hier.level(Level::SubContainer).cell)?;
    assert!(!sub.contains(r#"<g id="top">"#));
    Ok(())
}
#[test]
fn generate_files() -> GridResult<()> {
    let dir = tempfile::tempdir().map_err(|e| GridError::Boxed(Box::new(e)))?;
    let gds = dir.path().join("output.gds");
    let svg = dir.path().join("output.svg");
    let (lib, hier) = generate(None, &gds, &svg)?;
    assert_eq!(hier.top().extent, Extent::square(180.0));
    let read = |p: &Path| std::fs::read(p).map_err(|e| GridError::Boxed(Box::new(e)));
    let gds_bytes = read(&gds)?;
    let svg_bytes = read(&svg)?;

    // The file content is exactly the library's encoding
    let mut expected = Vec::new();
    lib.to_gds()?
        .write(&mut expected)
        .map_err(|e| GridError::Store(e.into()))?;
    assert_eq!(gds_bytes, expected);
    assert_eq!(svg_bytes, lib.to_svg(hier.top().cell)?.into_bytes());

    // And a second run reproduces both files
    let (gds2, svg2) = (dir.path().join("again.gds"), dir.path().join("again.svg"));
    generate(None, &gds2, &svg2)?;
    assert_eq!(read(&gds2)?, gds_bytes);
    assert_eq!(read(&svg2)?, svg_bytes);
    Ok(())
}
#[test]
fn export_io_errors() -> GridResult<()> {
    let (lib, hier) = default_build()?;
    let missing = Path::new("/nonexistent-dir/for/layout21grid/output.gds");
    assert!(matches!(lib.export_layout(missing), Err(StoreError::Io(_))));
    assert!(matches!(
        lib.render_preview(hier.top().cell, missing),
        Err(StoreError::Io(_))
    ));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Extents follow the count-times-child-plus-gaps formula, and are never negative
    #[test]
    fn extent_formula(r in 1usize..12, c in 1usize..12, s in 0u32..500, cw in 0u32..500, ch in 0u32..500) {
        let (s, cw, ch) = (s as f64, cw as f64, ch as f64);
        let d = desc(r, c, s);
        let (w, h) = compute_extent(&d, cw, ch).unwrap();
        prop_assert_eq!(w, (c - 1) as f64 * s + c as f64 * cw);
        prop_assert_eq!(h, (r - 1) as f64 * s + r as f64 * ch);
        prop_assert!(w >= 0.0 && h >= 0.0);
        // Pure: the same inputs give the same outputs
        prop_assert_eq!(compute_extent(&d, cw, ch).unwrap(), (w, h));
        // Single-instance grids are their child, regardless of spacing
        prop_assert_eq!(compute_extent(&desc(1, 1, s), cw, ch).unwrap(), (cw, ch));
        // And zero spacing abuts instances
        prop_assert_eq!(
            compute_extent(&desc(r, c, 0.0), cw, ch).unwrap(),
            (c as f64 * cw, r as f64 * ch)
        );
    }

    /// Placements cover exactly the expected lattice, without duplicates, and tile the computed extent
    #[test]
    fn placement_lattice(r in 1usize..8, c in 1usize..8, s in 0u32..100, cw in 1u32..100, ch in 1u32..100) {
        let (s, cw, ch) = (s as f64, cw as f64, ch as f64);
        let d = desc(r, c, s);
        let mut lib = Library::new("props");
        let child = lib.new_cell("child").unwrap();
        lib.add_shape(child, Shape::rect(Layer::default(), Point::default(), Point::new(cw, ch))).unwrap();
        let target = lib.new_cell("target").unwrap();
        let n = place_grid(&d, child, target, cw, ch, &mut lib).unwrap();
        prop_assert_eq!(n, r * c);

        let placed = origins(&lib, target);
        let mut expected = Vec::new();
        for col in 0..c {
            for row in 0..r {
                expected.push((col as f64 * (cw + s), row as f64 * (ch + s)));
            }
        }
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert_eq!(&placed, &expected);

        let distinct: HashSet<(u64, u64)> = placed.iter().map(|(x, y)| (x.to_bits(), y.to_bits())).collect();
        prop_assert_eq!(distinct.len(), r * c);

        let (w, h) = compute_extent(&d, cw, ch).unwrap();
        let bbox = lib.bbox(target).unwrap();
        prop_assert_eq!(bbox.p0, Point::new(0.0, 0.0));
        prop_assert_eq!(bbox.size(), Extent::new(w, h));
    }

    /// Invalid descriptors never reach the store
    #[test]
    fn invalid_descriptors(r in 0usize..3, c in 0usize..3, s in -100i32..100) {
        let valid = r >= 1 && c >= 1 && s >= 0;
        let res = LevelDescriptor::new(r, c, s as f64);
        prop_assert_eq!(res.is_ok(), valid);
    }
}
