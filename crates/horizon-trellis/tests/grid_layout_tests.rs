//! Integration tests for grid layout through containers.
//!
//! These drive the public widget API end to end: widgets are created against
//! a toolkit, placed on a container's grid and laid out at a given client
//! size, and the tests check the bounds written back to the children.

use horizon_trellis::config::ToolkitConfig;
use horizon_trellis::render::{Bitmap, Image, RectanglePixels, Size, SizePixels};
use horizon_trellis::toolkit::Toolkit;
use horizon_trellis::widget::Widget;
use horizon_trellis::widget::layout::{GridLayout, GridRange};
use horizon_trellis::widget::widgets::{Container, ImageView, ImageViewMode, Spacer};
use horizon_trellis::{LayoutError, Object, ObjectId};

fn serial_toolkit() -> Toolkit {
    let mut config = ToolkitConfig::default();
    config.layout.parallel_rows = false;
    Toolkit::init(config).unwrap()
}

fn stretch_view(toolkit: &Toolkit) -> Box<ImageView> {
    let mut view = ImageView::new(toolkit).unwrap();
    view.set_mode(ImageViewMode::Stretch);
    view.set_image(Some(Bitmap::new(10, 10, 96).unwrap().into()));
    Box::new(view)
}

fn bounds_of(container: &Container, id: ObjectId) -> RectanglePixels {
    container.child(id).unwrap().widget_base().bounds()
}

fn place(container: &mut Container, widget: Box<dyn Widget>, range: GridRange) -> ObjectId {
    let id = container.add_child(widget).unwrap();
    container.set_range(id, range).unwrap();
    id
}

#[test]
fn test_two_image_views_share_a_row() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());

    let left = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 0));
    let right = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 1));

    container.resize(SizePixels::new(220, 100));
    let results = container.perform_layout();

    assert_eq!(results.len(), 2);
    assert_eq!(bounds_of(&container, left), RectanglePixels::new(9, 9, 98, 82));
    assert_eq!(bounds_of(&container, right), RectanglePixels::new(113, 9, 98, 82));
    assert!(!container.is_layout_pending());
}

#[test]
fn test_greedy_spacer_pushes_fixed_content_aside() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());

    let mut view = ImageView::new(&toolkit).unwrap();
    view.set_image(Some(Bitmap::new(50, 30, 96).unwrap().into()));
    let view = place(&mut container, Box::new(view), GridRange::cell(0, 0));
    let spring = place(
        &mut container,
        Box::new(Spacer::h_spacer(&toolkit).unwrap()),
        GridRange::cell(0, 1),
    );

    container.resize(SizePixels::new(300, 48));
    container.perform_layout();

    assert_eq!(bounds_of(&container, view), RectanglePixels::new(9, 9, 50, 30));
    let spring = bounds_of(&container, spring);
    assert_eq!((spring.x, spring.width), (65, 226));
}

#[test]
fn test_hidden_child_is_skipped() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());

    let left = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 0));
    let right = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 1));

    container
        .child_mut(left)
        .unwrap()
        .widget_base_mut()
        .set_visible(false)
        .unwrap();
    assert!(container.is_layout_pending());

    container.resize(SizePixels::new(220, 100));
    let results = container.perform_layout();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].widget, Some(right));
    // The empty first column takes neither space nor spacing.
    assert_eq!(bounds_of(&container, right), RectanglePixels::new(9, 9, 202, 82));
}

#[test]
fn test_rejected_changes_leave_layout_untouched() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();

    let view = container.add_child(stretch_view(&toolkit)).unwrap();
    assert_eq!(
        container.set_range(view, GridRange::cell(0, 0)),
        Err(LayoutError::NoLayout)
    );

    container.set_layout(toolkit.grid_layout());
    container.set_range(view, GridRange::cell(1, 1)).unwrap();

    let stranger = Spacer::h_spacer(&toolkit).unwrap();
    let layout = container.layout_mut().unwrap();

    assert_eq!(
        layout.set_range(stranger.object_id(), GridRange::cell(4, 4)),
        Err(LayoutError::NotAChild(stranger.object_id()))
    );
    assert!(matches!(
        layout.set_range(view, GridRange::new(0, 0, 0, 3)),
        Err(LayoutError::ZeroSpan { .. })
    ));
    assert_eq!(
        layout.set_column_stretch_factor(5, 0),
        Err(LayoutError::InvalidStretchFactor(0))
    );

    assert_eq!((layout.row_count(), layout.column_count()), (2, 2));
    assert_eq!(layout.range(view), Some(GridRange::cell(1, 1)));
    assert_eq!(layout.column_stretch_factor(5), 1);
}

#[test]
fn test_detached_layout_rejects_changes() {
    let mut layout = GridLayout::new();
    assert_eq!(layout.set_row_stretch_factor(0, 2), Err(LayoutError::NoContainer));
    assert_eq!(layout.row_count(), 0);
}

#[test]
fn test_removed_child_frees_its_cells() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());

    let left = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 0));
    let right = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 1));

    let removed = container.remove_child(left).unwrap();
    assert_eq!(removed.widget_base().parent_id(), None);
    assert_eq!(container.layout().unwrap().widget_at(0, 0), None);
    assert_eq!(container.layout().unwrap().range(left), None);

    container.resize(SizePixels::new(220, 100));
    container.perform_layout();
    assert_eq!(bounds_of(&container, right), RectanglePixels::new(9, 9, 202, 82));
}

#[test]
fn test_nested_containers_lay_out_recursively() {
    let toolkit = serial_toolkit();

    let mut inner = Container::new(&toolkit).unwrap();
    inner.set_layout(toolkit.grid_layout());
    place(&mut inner, stretch_view(&toolkit), GridRange::cell(0, 0));

    let mut outer = Container::new(&toolkit).unwrap();
    outer.set_layout(toolkit.grid_layout());
    let inner = place(&mut outer, Box::new(inner), GridRange::cell(0, 0));
    let view = place(&mut outer, stretch_view(&toolkit), GridRange::cell(0, 1));

    outer.resize(SizePixels::new(220, 100));
    outer.perform_layout();

    // The nested grid's 9px margins raise its column minimum, so both greedy
    // columns share the excess on top of different minimums.
    assert_eq!(bounds_of(&outer, inner), RectanglePixels::new(9, 9, 107, 82));
    assert_eq!(bounds_of(&outer, view), RectanglePixels::new(122, 9, 89, 82));

    outer
        .child_mut(inner)
        .unwrap()
        .widget_base_mut()
        .set_min_size(Size::new(150, 0));
    assert!(outer.is_layout_pending());
}

#[test]
fn test_parallel_rows_match_serial_rows() {
    let parallel = {
        let mut config = ToolkitConfig::default();
        config.layout.parallel_row_threshold = 1;
        config.thread_pool.num_threads = Some(2);
        Toolkit::init(config).unwrap()
    };
    let serial = serial_toolkit();
    assert!(parallel.thread_pool().is_some());
    assert!(serial.thread_pool().is_none());

    let build = |toolkit: &Toolkit| {
        let mut container = Container::new(toolkit).unwrap();
        container.set_layout(toolkit.grid_layout());
        for (row, height) in [10, 20, 30, 40].into_iter().enumerate() {
            let spacer = Spacer::v_spacer_fixed(toolkit, height).unwrap();
            place(&mut container, Box::new(spacer), GridRange::cell(row, 0));
        }
        container
    };

    let parallel = build(&parallel);
    let serial = build(&serial);

    assert_eq!(parallel.min_size(), serial.min_size());
    assert_eq!(parallel.min_size(), SizePixels::new(18, 136));
}

#[test]
fn test_high_dpi_container_scales_margins() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());
    let view = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 0));

    container.apply_dpi(192);
    assert_eq!(container.child(view).unwrap().widget_base().dpi(), 192);

    container.resize(SizePixels::new(200, 100));
    container.perform_layout();
    assert_eq!(bounds_of(&container, view), RectanglePixels::new(18, 18, 164, 64));
}

#[test]
fn test_layout_emits_trace_events() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());
    let image: Image = Bitmap::new(4, 4, 96).unwrap().into();
    let mut view = ImageView::new(&toolkit).unwrap();
    view.set_image(Some(image));
    place(&mut container, Box::new(view), GridRange::cell(0, 0));

    container.resize(SizePixels::new(64, 64));
    assert_eq!(container.perform_layout().len(), 1);
}

#[test]
fn test_overlapping_placement_displaces_earlier_child() {
    let toolkit = serial_toolkit();
    let mut container = Container::new(&toolkit).unwrap();
    container.set_layout(toolkit.grid_layout());

    let wide = place(&mut container, stretch_view(&toolkit), GridRange::new(0, 0, 1, 2));
    let narrow = place(&mut container, stretch_view(&toolkit), GridRange::cell(0, 0));

    let layout = container.layout().unwrap();
    assert_eq!(layout.range(wide), None);
    assert_eq!(layout.widget_at(0, 1), None);

    container.resize(SizePixels::new(220, 100));
    let results = container.perform_layout();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].widget, Some(narrow));
    assert_eq!(bounds_of(&container, narrow), RectanglePixels::new(9, 9, 202, 82));
}
