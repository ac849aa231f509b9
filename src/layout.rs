// Ticket geometry: turns one candidate into a display list of drawing
// operations. Coordinates are PDF points with the origin at bottom-left.

use crate::context::RenderContext;
use crate::error::RecordError;
use crate::metrics::text_width;
use crate::record::CandidateRecord;

// ============================================================================
// Constants
// ============================================================================

/// A4 in points
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Vertical origins of the two copy blocks
pub const TOP_COPY_ORIGIN: f32 = PAGE_HEIGHT - 50.0;
pub const BOTTOM_COPY_ORIGIN: f32 = PAGE_HEIGHT / 2.0 - 30.0;

/// Copy block border, relative to the block origin
const BOX_MARGIN: f32 = 30.0;
const BOX_TOP_OFFSET: f32 = 40.0;
const BOX_BOTTOM_OFFSET: f32 = 320.0;

/// Rules inside and between blocks
const RULE_MARGIN: f32 = 40.0;
const SEPARATOR_GAP: f32 = 10.0;

const LOGO_X: f32 = 40.0;
const LOGO_OFFSET: f32 = 30.0;
const LOGO_SIZE: f32 = 60.0;

const PHOTO_RIGHT_INSET: f32 = 150.0;
const PHOTO_SIZE: f32 = 100.0;

/// Header line offsets below the origin
const DEPARTMENT_OFFSET: f32 = 20.0;
const TITLE_OFFSET: f32 = 40.0;
const DIVIDER_OFFSET: f32 = 50.0;

/// Student detail lines
const DETAIL_X: f32 = 50.0;
const SEAT_LINE_OFFSET: f32 = 80.0;
const NAME_LINE_OFFSET: f32 = 100.0;
const SUBJECTS_HEADING_OFFSET: f32 = 120.0;

/// Subject list
const SUBJECT_X: f32 = 70.0;
const SUBJECTS_START_OFFSET: f32 = 140.0;
pub const SUBJECT_LINE_HEIGHT: f32 = 20.0;
const SIGN_BOX_X: f32 = 200.0;
const SIGN_BOX_DROP: f32 = 5.0;
const SIGN_BOX_WIDTH: f32 = 60.0;
const SIGN_BOX_HEIGHT: f32 = 15.0;

/// Offsets below the running cursor
const NOTE_SPACING: f32 = 20.0;
const EXAM_CENTER_DROP: f32 = 30.0;
const SIGNATURE_DROP: f32 = 70.0;
const SIGNATURE_XS: [f32; 3] = [50.0, 250.0, 450.0];

/// Minimum gap between the signature baseline and the block border
const BOTTOM_CLEARANCE: f32 = 5.0;

/// Subjects that fit above the block border; anything more would push the
/// signature line out of the box.
pub const MAX_SUBJECTS: usize = ((BOX_BOTTOM_OFFSET
    - BOTTOM_CLEARANCE
    - SUBJECTS_START_OFFSET
    - NOTE_SPACING
    - SIGNATURE_DROP)
    / SUBJECT_LINE_HEIGHT) as usize;

const FOOTER_Y: f32 = 30.0;

/// Font sizes in points
const INSTITUTION_FONT_SIZE: f32 = 13.0;
const DEPARTMENT_FONT_SIZE: f32 = 12.0;
const TITLE_FONT_SIZE: f32 = 11.0;
const LABEL_FONT_SIZE: f32 = 10.0;
const BODY_FONT_SIZE: f32 = 10.0;
const NOTE_FONT_SIZE: f32 = 8.0;

const BORDER_WIDTH: f32 = 1.0;
const RULE_WIDTH: f32 = 0.5;

pub const INSTITUTION_NAME: &str = "GURU NANAK DEV ENGINEERING COLLEGE, BIDAR";
pub const EXAM_TITLE: &str = "ADMISSION TICKET FOR B.E EXAMINATION JUNE / JULY 2025";
const NOTE_LINES: [&str; 2] = [
    "Note: Please verify the eligibility of candidate before issuing the admission ticket.",
    "This is Electronically Generated Admission Ticket.",
];
const SIGNATURE_LABELS: [&str; 3] = [
    "Signature of the Candidate",
    "Signature of the Principal with seal",
    "Signature of the Hod",
];
pub const FOOTER_NOTE: &str = "Candidate must read the instructions provided in the answer booklet before commencement of examination.";

// ============================================================================
// Display List
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Logo,
    Photo,
}

/// One drawing instruction. Text `x` is the left end of the baseline, already
/// adjusted for centering or right alignment.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font: Font,
        size: f32,
    },
    Image {
        asset: AssetKind,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyLabel {
    Student,
    College,
}

impl CopyLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            CopyLabel::Student => "STUDENT COPY",
            CopyLabel::College => "COLLEGE COPY",
        }
    }
}

/// Which optional images loaded successfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decorations {
    pub logo: bool,
    pub photo: bool,
}

/// One rendered copy of the ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyBlock {
    pub label: CopyLabel,
    pub y_start: f32,
    /// Cursor right after the subject list
    pub subjects_end: f32,
    pub ops: Vec<DrawOp>,
}

/// The full page: both copy blocks plus separators and footer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub copies: Vec<CopyBlock>,
    pub trailer: Vec<DrawOp>,
}

impl PageLayout {
    /// All operations in paint order.
    pub fn ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.copies
            .iter()
            .flat_map(|copy| copy.ops.iter())
            .chain(self.trailer.iter())
    }
}

// ============================================================================
// Page Assembly
// ============================================================================

pub fn layout_page(
    record: &CandidateRecord,
    context: &RenderContext,
    decorations: Decorations,
) -> Result<PageLayout, RecordError> {
    let placements = [
        (CopyLabel::Student, TOP_COPY_ORIGIN),
        (CopyLabel::College, BOTTOM_COPY_ORIGIN),
    ];

    let mut copies = Vec::with_capacity(placements.len());
    let mut trailer = Vec::new();
    for (label, y_start) in placements {
        copies.push(layout_copy(record, context, decorations, y_start, label)?);

        let y = y_start - BOX_BOTTOM_OFFSET - SEPARATOR_GAP;
        trailer.push(rule(RULE_MARGIN, y, PAGE_WIDTH - RULE_MARGIN, RULE_WIDTH));
    }

    trailer.push(centered(FOOTER_NOTE, FOOTER_Y, Font::Oblique, NOTE_FONT_SIZE));

    Ok(PageLayout { copies, trailer })
}

// ============================================================================
// Copy Block
// ============================================================================

pub fn layout_copy(
    record: &CandidateRecord,
    context: &RenderContext,
    decorations: Decorations,
    y_start: f32,
    label: CopyLabel,
) -> Result<CopyBlock, RecordError> {
    let subjects = record.checked_subjects()?;
    let mut ops = Vec::new();

    // Border
    ops.push(DrawOp::Rect {
        x: BOX_MARGIN,
        y: y_start - BOX_BOTTOM_OFFSET,
        width: PAGE_WIDTH - 2.0 * BOX_MARGIN,
        height: BOX_TOP_OFFSET + BOX_BOTTOM_OFFSET,
        line_width: BORDER_WIDTH,
    });

    if decorations.logo {
        ops.push(DrawOp::Image {
            asset: AssetKind::Logo,
            x: LOGO_X,
            y: y_start - LOGO_OFFSET,
            width: LOGO_SIZE,
            height: LOGO_SIZE,
        });
    }

    // Header
    ops.push(centered(INSTITUTION_NAME, y_start, Font::Bold, INSTITUTION_FONT_SIZE));
    ops.push(centered(
        &context.department_display(),
        y_start - DEPARTMENT_OFFSET,
        Font::Bold,
        DEPARTMENT_FONT_SIZE,
    ));
    ops.push(centered(EXAM_TITLE, y_start - TITLE_OFFSET, Font::Bold, TITLE_FONT_SIZE));
    ops.push(rule(
        RULE_MARGIN,
        y_start - DIVIDER_OFFSET,
        PAGE_WIDTH - RULE_MARGIN,
        RULE_WIDTH,
    ));

    ops.push(right_aligned(
        label.as_str(),
        PAGE_WIDTH - RULE_MARGIN,
        y_start - TITLE_OFFSET,
        Font::Bold,
        LABEL_FONT_SIZE,
    ));

    // Student details
    ops.push(text(
        format!(
            "1. UNIVERSITY SEAT NO.: {}     No: {}     Date: {}",
            record.seat_no, record.exam_no, record.date
        ),
        DETAIL_X,
        y_start - SEAT_LINE_OFFSET,
        Font::Regular,
        BODY_FONT_SIZE,
    ));
    ops.push(text(
        format!("2. NAME OF THE CANDIDATE: {}", record.name),
        DETAIL_X,
        y_start - NAME_LINE_OFFSET,
        Font::Regular,
        BODY_FONT_SIZE,
    ));
    ops.push(text(
        "3. SUBJECTS APPLIED:",
        DETAIL_X,
        y_start - SUBJECTS_HEADING_OFFSET,
        Font::Regular,
        BODY_FONT_SIZE,
    ));

    // Subjects, each with an empty signature box
    let mut cursor = y_start - SUBJECTS_START_OFFSET;
    for subject in &subjects {
        ops.push(text(*subject, SUBJECT_X, cursor, Font::Regular, BODY_FONT_SIZE));
        ops.push(DrawOp::Rect {
            x: SIGN_BOX_X,
            y: cursor - SIGN_BOX_DROP,
            width: SIGN_BOX_WIDTH,
            height: SIGN_BOX_HEIGHT,
            line_width: BORDER_WIDTH,
        });
        cursor -= SUBJECT_LINE_HEIGHT;
    }
    let subjects_end = cursor;

    // Notes follow wherever the subject list ended
    ops.push(text(NOTE_LINES[0], SUBJECT_X, cursor, Font::Oblique, NOTE_FONT_SIZE));
    cursor -= NOTE_SPACING;
    ops.push(text(NOTE_LINES[1], SUBJECT_X, cursor, Font::Oblique, NOTE_FONT_SIZE));

    // Photo hangs from the seat number line, not from the cursor
    if decorations.photo {
        ops.push(DrawOp::Image {
            asset: AssetKind::Photo,
            x: PAGE_WIDTH - PHOTO_RIGHT_INSET,
            y: y_start - SEAT_LINE_OFFSET - PHOTO_SIZE,
            width: PHOTO_SIZE,
            height: PHOTO_SIZE,
        });
    }

    ops.push(text(
        format!("Exam Center: {}", record.exam_center),
        DETAIL_X,
        cursor - EXAM_CENTER_DROP,
        Font::Regular,
        BODY_FONT_SIZE,
    ));

    for (label_text, x) in SIGNATURE_LABELS.iter().zip(SIGNATURE_XS) {
        ops.push(text(
            *label_text,
            x,
            cursor - SIGNATURE_DROP,
            Font::Regular,
            BODY_FONT_SIZE,
        ));
    }

    Ok(CopyBlock {
        label,
        y_start,
        subjects_end,
        ops,
    })
}

// ============================================================================
// Op Builders
// ============================================================================

fn text(content: impl Into<String>, x: f32, y: f32, font: Font, size: f32) -> DrawOp {
    DrawOp::Text {
        text: content.into(),
        x,
        y,
        font,
        size,
    }
}

fn centered(content: &str, y: f32, font: Font, size: f32) -> DrawOp {
    let x = PAGE_WIDTH / 2.0 - text_width(content, font, size) / 2.0;
    text(content, x, y, font, size)
}

fn right_aligned(content: &str, right_x: f32, y: f32, font: Font, size: f32) -> DrawOp {
    let x = right_x - text_width(content, font, size);
    text(content, x, y, font, size)
}

fn rule(x1: f32, y: f32, x2: f32, line_width: f32) -> DrawOp {
    DrawOp::Line {
        x1,
        y1: y,
        x2,
        y2: y,
        line_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DEFAULT_DEPARTMENT;
    use crate::record::tests::sample_record;

    fn find_text(ops: &[DrawOp], needle: &str) -> Option<(f32, f32)> {
        ops.iter().find_map(|op| match op {
            DrawOp::Text { text, x, y, .. } if text.starts_with(needle) => Some((*x, *y)),
            _ => None,
        })
    }

    fn sign_boxes(ops: &[DrawOp]) -> Vec<f32> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, y, width, .. }
                    if *x == SIGN_BOX_X && *width == SIGN_BOX_WIDTH =>
                {
                    Some(*y)
                }
                _ => None,
            })
            .collect()
    }

    fn images(ops: &[DrawOp], kind: AssetKind) -> usize {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::Image { asset, .. } if *asset == kind))
            .count()
    }

    fn copy_with_subjects(subjects: &str, decorations: Decorations) -> CopyBlock {
        let mut record = sample_record();
        record.subjects_applied = subjects.to_string();
        layout_copy(
            &record,
            &RenderContext::default(),
            decorations,
            TOP_COPY_ORIGIN,
            CopyLabel::Student,
        )
        .unwrap()
    }

    #[test]
    fn origins_match_page_geometry() {
        assert_eq!(TOP_COPY_ORIGIN, 792.0);
        assert_eq!(BOTTOM_COPY_ORIGIN, 391.0);
        assert_eq!(MAX_SUBJECTS, 4);
    }

    #[test]
    fn cursor_tracks_subject_count() {
        for n in 1..=MAX_SUBJECTS {
            let subjects: Vec<String> = (0..n).map(|i| format!("SUB{i}")).collect();
            let copy = copy_with_subjects(&subjects.join(","), Decorations::default());
            let expected = TOP_COPY_ORIGIN - 140.0 - 20.0 * n as f32;
            assert_eq!(copy.subjects_end, expected);

            let (_, note_y) = find_text(&copy.ops, "Note:").unwrap();
            let (_, electronic_y) = find_text(&copy.ops, "This is Electronically").unwrap();
            let (_, center_y) = find_text(&copy.ops, "Exam Center:").unwrap();
            assert_eq!(note_y, expected);
            assert_eq!(electronic_y, expected - 20.0);
            assert_eq!(center_y, expected - 20.0 - 30.0);
            for label in SIGNATURE_LABELS {
                assert_eq!(find_text(&copy.ops, label).unwrap().1, expected - 20.0 - 70.0);
            }
        }
    }

    #[test]
    fn two_subjects_get_two_boxes() {
        let copy = copy_with_subjects("21CS81 - ML, 21CS82 - SE", Decorations::default());
        assert_eq!(find_text(&copy.ops, "21CS81 - ML"), Some((SUBJECT_X, 652.0)));
        assert_eq!(find_text(&copy.ops, "21CS82 - SE"), Some((SUBJECT_X, 632.0)));
        assert_eq!(sign_boxes(&copy.ops), vec![647.0, 627.0]);
        assert_eq!(TOP_COPY_ORIGIN - 140.0 - copy.subjects_end, 40.0);
    }

    #[test]
    fn header_uses_fixed_offsets() {
        let copy = copy_with_subjects("A", Decorations::default());
        assert_eq!(find_text(&copy.ops, INSTITUTION_NAME).unwrap().1, 792.0);
        assert_eq!(find_text(&copy.ops, DEFAULT_DEPARTMENT).unwrap().1, 772.0);
        assert_eq!(find_text(&copy.ops, EXAM_TITLE).unwrap().1, 752.0);
        assert_eq!(find_text(&copy.ops, "1. UNIVERSITY SEAT NO.").unwrap(), (50.0, 712.0));
        assert_eq!(find_text(&copy.ops, "2. NAME OF THE CANDIDATE").unwrap(), (50.0, 692.0));
        assert!(copy.ops.contains(&DrawOp::Rect {
            x: 30.0,
            y: 472.0,
            width: 535.0,
            height: 360.0,
            line_width: 1.0,
        }));
    }

    #[test]
    fn centered_and_right_aligned_text() {
        let copy = copy_with_subjects("A", Decorations::default());
        let (x, _) = find_text(&copy.ops, INSTITUTION_NAME).unwrap();
        let width = text_width(INSTITUTION_NAME, Font::Bold, INSTITUTION_FONT_SIZE);
        assert!((x + width / 2.0 - PAGE_WIDTH / 2.0).abs() < 1e-3);

        let (x, y) = find_text(&copy.ops, "STUDENT COPY").unwrap();
        let width = text_width("STUDENT COPY", Font::Bold, LABEL_FONT_SIZE);
        assert!((x + width - 555.0).abs() < 1e-3);
        assert_eq!(y, 752.0);
    }

    #[test]
    fn photo_anchored_to_seat_line() {
        let decorations = Decorations {
            logo: false,
            photo: true,
        };
        let short = copy_with_subjects("A", decorations);
        let long = copy_with_subjects("A, B, C, D", decorations);
        let photo = |ops: &[DrawOp]| {
            ops.iter()
                .find(|op| matches!(op, DrawOp::Image { asset: AssetKind::Photo, .. }))
                .cloned()
        };
        let expected = DrawOp::Image {
            asset: AssetKind::Photo,
            x: 445.0,
            y: 612.0,
            width: 100.0,
            height: 100.0,
        };
        assert_eq!(photo(&short.ops), Some(expected.clone()));
        assert_eq!(photo(&long.ops), Some(expected));
    }

    #[test]
    fn missing_photo_only_drops_the_image() {
        let with = copy_with_subjects("A, B", Decorations { logo: true, photo: true });
        let without = copy_with_subjects("A, B", Decorations { logo: true, photo: false });
        assert_eq!(images(&with.ops, AssetKind::Photo), 1);
        assert_eq!(images(&without.ops, AssetKind::Photo), 0);
        let filtered: Vec<DrawOp> = with
            .ops
            .into_iter()
            .filter(|op| !matches!(op, DrawOp::Image { asset: AssetKind::Photo, .. }))
            .collect();
        assert_eq!(filtered, without.ops);
    }

    #[test]
    fn missing_logo_only_drops_the_image() {
        let record = sample_record();
        let context = RenderContext::default();
        let with = layout_page(&record, &context, Decorations { logo: true, photo: false }).unwrap();
        let without = layout_page(&record, &context, Decorations::default()).unwrap();

        let with_ops: Vec<&DrawOp> = with.ops().collect();
        let logo = DrawOp::Image {
            asset: AssetKind::Logo,
            x: 40.0,
            y: 762.0,
            width: 60.0,
            height: 60.0,
        };
        assert!(with_ops.contains(&&logo));
        let filtered: Vec<&DrawOp> = with_ops
            .into_iter()
            .filter(|op| !matches!(op, DrawOp::Image { asset: AssetKind::Logo, .. }))
            .collect();
        let without_ops: Vec<&DrawOp> = without.ops().collect();
        assert_eq!(filtered, without_ops);
    }

    #[test]
    fn page_has_two_labeled_copies_and_footer() {
        let page = layout_page(&sample_record(), &RenderContext::default(), Decorations::default())
            .unwrap();
        let labels: Vec<CopyLabel> = page.copies.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec![CopyLabel::Student, CopyLabel::College]);
        assert_eq!(page.copies[1].y_start, BOTTOM_COPY_ORIGIN);
        assert!(find_text(&page.copies[1].ops, "COLLEGE COPY").is_some());

        let separators: Vec<f32> = page
            .trailer
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { y1, .. } => Some(*y1),
                _ => None,
            })
            .collect();
        assert_eq!(separators, vec![462.0, 61.0]);
        assert_eq!(find_text(&page.trailer, "Candidate must read").unwrap().1, FOOTER_Y);
    }

    #[test]
    fn copies_do_not_overlap() {
        let top_bottom = TOP_COPY_ORIGIN - BOX_BOTTOM_OFFSET;
        let bottom_top = BOTTOM_COPY_ORIGIN + BOX_TOP_OFFSET;
        assert!(top_bottom > bottom_top);
        assert!(BOTTOM_COPY_ORIGIN - BOX_BOTTOM_OFFSET > FOOTER_Y);
    }

    #[test]
    fn signatures_stay_inside_block_at_capacity() {
        let subjects: Vec<String> = (0..MAX_SUBJECTS).map(|i| format!("S{i}")).collect();
        let copy = copy_with_subjects(&subjects.join(","), Decorations::default());
        let (_, y) = find_text(&copy.ops, SIGNATURE_LABELS[0]).unwrap();
        assert!(y >= TOP_COPY_ORIGIN - BOX_BOTTOM_OFFSET + BOTTOM_CLEARANCE);
    }

    #[test]
    fn overflowing_subjects_are_rejected() {
        let mut record = sample_record();
        record.subjects_applied = "A, B, C, D, E".to_string();
        let err = layout_page(&record, &RenderContext::default(), Decorations::default())
            .unwrap_err();
        assert_eq!(err, RecordError::TooManySubjects { count: 5, max: 4 });
    }
}
