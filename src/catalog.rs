//! The built-in question catalog and the rules every catalog must satisfy.
//!
//! Flow:
//! 1) App loads the built-in tables below, or a TOML bank when one is
//!    configured (the bank replaces the built-ins wholesale).
//! 2) Each tier is checked against its exact image/typeface composition.
//! 3) Sessions sample from the validated catalog (see the session engine).
//!
//! Any violation is fatal at startup and at session start; the diagnostics
//! name the offending tier, kind, and item ids.

use thiserror::Error;

use crate::config::{CatalogCfg, GymConfig, QuestionCfg};
use crate::domain::{Question, QuestionKind, Tier};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
  /// A bank item arrived without a usable tier or kind tag, or with missing
  /// or empty display fields.
  #[error("question '{id}': {problem}")]
  BadItem { id: String, problem: String },

  /// The TOML `questions` array would not deserialize at all.
  #[error("question bank failed to parse: {detail}")]
  MalformedBank { detail: String },

  /// Duplicate ids would make answered-question bookkeeping ambiguous.
  #[error("duplicate question id '{id}'")]
  DuplicateId { id: String },

  /// A tier holds the wrong number of questions of one kind.
  #[error("tier '{tier}' must hold exactly {expected} {kind} question(s), found {found}: [{ids}]")]
  Composition { tier: &'static str, kind: &'static str, expected: usize, found: usize, ids: String },

  /// A tier has fewer questions than one session wants to draw.
  #[error("tier '{tier}' sample count {want} exceeds its {have} catalog question(s)")]
  SampleExceedsPool { tier: &'static str, want: usize, have: usize },
}

struct QuestionDef {
  id: &'static str,
  kind: QuestionKind,
  prompt: &'static str,
  option_a: &'static str,
  option_b: &'static str,
  explanation: &'static str,
}

macro_rules! q {
  ($id:expr, $kind:expr, $prompt:expr, $a:expr, $b:expr, $why:expr) => {
    QuestionDef {
      id: $id,
      kind: $kind,
      prompt: $prompt,
      option_a: $a,
      option_b: $b,
      explanation: $why,
    }
  };
}

use QuestionKind::{Image, Typeface};

const BEGINNER_ITEMS: &[QuestionDef] = &[
  q!("beg_img_alignment", Image, "Which layout feels more organized?", "img/beg/alignment-grid.png", "img/beg/alignment-loose.png", "Elements that share edges read as one structure; the grid version aligns headings, body, and imagery to common lines."),
  q!("beg_img_contrast", Image, "Which hero section is easier to read?", "img/beg/contrast-solid.png", "img/beg/contrast-faint.png", "Dark text on a light field keeps the copy legible; the faint version drops below a comfortable reading threshold."),
  q!("beg_img_whitespace", Image, "Which card layout is more comfortable to scan?", "img/beg/whitespace-roomy.png", "img/beg/whitespace-packed.png", "Generous padding separates groups and gives each element room; content crammed edge-to-edge forces the eye to untangle it."),
  q!("beg_img_hierarchy", Image, "Which article page shows its structure at a glance?", "img/beg/hierarchy-scaled.png", "img/beg/hierarchy-flat.png", "A clear size ramp between title, subtitle, and body tells you what to read first; uniform sizing hides the structure."),
  q!("beg_img_line_length", Image, "Which paragraph block is easier to read?", "img/beg/measure-66ch.png", "img/beg/measure-full.png", "Keeping lines near 45 to 75 characters lets the eye return reliably; full-width lines make you lose your place."),
  q!("beg_img_buttons", Image, "Which checkout button is more obviously clickable?", "img/beg/button-solid.png", "img/beg/button-bare.png", "A filled shape with padding reads as pressable; a bare text string gives no affordance."),
  q!("beg_img_palette", Image, "Which dashboard uses color more effectively?", "img/beg/palette-restrained.png", "img/beg/palette-rainbow.png", "One accent over a neutral base directs attention; ten competing hues make everything equally loud."),
  q!("beg_img_font_count", Image, "Which poster handles its typeface choices better?", "img/beg/fonts-two.png", "img/beg/fonts-five.png", "Two related families cover the hierarchy cleanly; five unrelated fonts fragment the composition."),
  q!("beg_img_nav_labels", Image, "Which sidebar is easier for a first-time user?", "img/beg/nav-labeled.png", "img/beg/nav-glyphs.png", "Icons plus labels are unambiguous; icon-only navigation makes users guess."),
  q!("beg_img_form_labels", Image, "Which signup form will cause fewer mistakes?", "img/beg/form-top-labels.png", "img/beg/form-placeholders.png", "Persistent labels keep context after you start typing; placeholder-only labels vanish exactly when you need them."),
  q!("beg_img_photo_text", Image, "Which banner keeps its caption readable over the photo?", "img/beg/overlay-scrim.png", "img/beg/overlay-raw.png", "A subtle scrim restores contrast behind the text; type set straight onto a busy photo disappears into the detail."),
  q!("beg_img_icon_style", Image, "Which toolbar looks like one product?", "img/beg/icons-uniform.png", "img/beg/icons-mixed.png", "Icons drawn with one stroke weight and corner radius read as a family; mixing outline, filled, and skeuomorphic styles looks stitched together."),
  q!("beg_img_caps_body", Image, "Which terms-of-service block is easier to get through?", "img/beg/body-sentence.png", "img/beg/body-allcaps.png", "Lowercase word shapes are what readers recognize; whole paragraphs in capitals lose those shapes and slow reading."),
  q!("beg_img_spacing_rhythm", Image, "Which pricing page feels more considered?", "img/beg/spacing-even.png", "img/beg/spacing-uneven.png", "A consistent spacing step between sections builds rhythm; arbitrary gaps look accidental."),
  q!("beg_img_cta_focus", Image, "Which landing page makes the next step clearer?", "img/beg/cta-single.png", "img/beg/cta-crowded.png", "One primary action stands alone; three equally weighted buttons split the decision."),
  q!("beg_type_body_serif", Typeface, "Which typeface for the body of a long article?", "Georgia", "Monoton", "Georgia was drawn for continuous reading on screens; Monoton is a one-line display novelty."),
  q!("beg_type_law_firm", Typeface, "Which typeface for a law firm's wordmark?", "Helvetica Neue", "Comic Sans MS", "A neutral grotesque carries institutional weight; Comic Sans signals casual handwriting."),
  q!("beg_type_ui_labels", Typeface, "Which typeface for interface labels and menus?", "Source Sans 3", "Papyrus", "A clean UI sans stays legible at 13px; Papyrus's rough edges fill in and distract."),
  q!("beg_type_novel", Typeface, "Which typeface for the pages of a printed novel?", "Garamond", "Impact", "An old-style serif is built for immersive text; Impact is a headline face with crushed counters."),
  q!("beg_type_dashboard", Typeface, "Which typeface for a metrics dashboard?", "Inter", "Brush Script MT", "Inter's open forms and steady rhythm suit dense data; script faces are for a few decorative words."),
];

const MID_ITEMS: &[QuestionDef] = &[
  q!("mid_img_type_scale", Image, "Which page uses its type scale better?", "img/mid/scale-modular.png", "img/mid/scale-adhoc.png", "Sizes drawn from one ratio relate to each other; ad-hoc sizes like 17, 19, and 23px look almost equal without being equal."),
  q!("mid_img_proximity", Image, "Which settings screen groups related controls better?", "img/mid/proximity-grouped.png", "img/mid/proximity-even.png", "Spacing is information: tight within groups, loose between them; even spacing everywhere erases the grouping."),
  q!("mid_img_destructive", Image, "Which dialog communicates a destructive action better?", "img/mid/delete-signal.png", "img/mid/delete-uniform.png", "Reserving red for Delete warns before the click; styling it like every other button invites accidents."),
  q!("mid_img_chart_labels", Image, "Which chart is faster to decode?", "img/mid/chart-direct.png", "img/mid/chart-legend.png", "Labels placed on the lines are read in place; a detached legend forces round trips."),
  q!("mid_img_table_numbers", Image, "Which invoice table is easier to total by eye?", "img/mid/table-right.png", "img/mid/table-centered.png", "Right-aligned figures stack their digits by magnitude; centered numbers scatter the decimal places."),
  q!("mid_img_crop", Image, "Which product photo crop works better in the grid?", "img/mid/crop-subject.png", "img/mid/crop-loose.png", "Cropping to the subject with consistent margins keeps the grid uniform; loose, uneven crops shrink the product and vary its scale."),
  q!("mid_img_toolbar", Image, "Which toolbar will users learn faster?", "img/mid/toolbar-labeled.png", "img/mid/toolbar-glyphs.png", "Pairing icons with short labels removes guessing for infrequent actions; icon-only rows depend on memorized meaning."),
  q!("mid_img_error_state", Image, "Which form handles an invalid email better?", "img/mid/error-inline.png", "img/mid/error-toast.png", "An inline message next to the field names the problem where it happened; a toast disappears and points at nothing."),
  q!("mid_img_elevation", Image, "Which card system uses elevation more coherently?", "img/mid/elevation-scaled.png", "img/mid/elevation-mixed.png", "A small, consistent shadow scale encodes layering; random blur radii make some cards float and others sink."),
  q!("mid_img_empty_state", Image, "Which empty inbox screen is more useful?", "img/mid/empty-guided.png", "img/mid/empty-blank.png", "Explaining what will appear and offering the first action turns a dead end into a start; a blank table reads as broken."),
  q!("mid_img_stepper", Image, "Which onboarding asks for less at once?", "img/mid/flow-stepper.png", "img/mid/flow-wall.png", "Three short steps with visible progress beat one wall of twenty fields."),
  q!("mid_img_skeleton", Image, "Which loading treatment feels faster?", "img/mid/loading-skeleton.png", "img/mid/loading-spinner.png", "Skeleton placeholders hold the final layout so content settles without jumping; a centered spinner hides everything, then reflows."),
  q!("mid_img_choices", Image, "Which control fits three visible choices better?", "img/mid/choices-radio.png", "img/mid/choices-dropdown.png", "Three options shown as radios are one glance and one click; a dropdown hides them behind an extra interaction."),
  q!("mid_img_truncation", Image, "Which list handles long titles better?", "img/mid/titles-wrap.png", "img/mid/titles-cut.png", "Wrapping to two lines before the ellipsis preserves meaning; hard cuts at a character count strand titles mid-word."),
  q!("mid_img_breadcrumbs", Image, "Which detail page tells you where you are?", "img/mid/nav-breadcrumbs.png", "img/mid/nav-bare.png", "A breadcrumb trail anchors the page in the hierarchy and offers a way back; a bare title strands deep links."),
  q!("mid_type_tabular", Typeface, "Which setting for a column of prices?", "Inter (tabular figures)", "Inter (proportional figures)", "Tabular figures share one width so digits align down the column; proportional figures wobble the decimal line by line."),
  q!("mid_type_code", Typeface, "Which typeface for code snippets in documentation?", "JetBrains Mono", "Arial", "A monospace draws O and 0, l and 1 apart and aligns indentation; a proportional face breaks both."),
  q!("mid_type_small_ui", Typeface, "Which typeface survives 11px settings text?", "Verdana", "Didot", "Verdana's large x-height and open apertures were designed for tiny screen sizes; Didot's hairlines evaporate below display sizes."),
  q!("mid_type_pairing", Typeface, "Which pairing for an editorial site?", "Playfair Display + Source Sans 3", "Playfair Display + Lobster", "A display serif over a quiet sans gives contrast with one voice; two display faces compete for the same job."),
  q!("mid_type_form_input", Typeface, "Which typeface for form inputs users must re-read?", "IBM Plex Sans", "Bebas Neue", "Plex has a lowercase and comfortable width for verification; Bebas is caps-only and condensed, built for posters, not addresses."),
];

const EXPERT_ITEMS: &[QuestionDef] = &[
  q!("exp_img_optical_center", Image, "Which play button sits correctly in its circle?", "img/exp/play-optical.png", "img/exp/play-geometric.png", "A triangle must be nudged right of geometric center to look centered; the mathematically centered one reads as leaning left."),
  q!("exp_img_caps_tracking", Image, "Which all-caps label is set better?", "img/exp/caps-tracked.png", "img/exp/caps-default.png", "Capitals need extra letter-spacing to breathe; default tracking is tuned for lowercase and leaves caps colliding."),
  q!("exp_img_dark_palette", Image, "Which dark theme is built better?", "img/exp/dark-layered.png", "img/exp/dark-inverted.png", "Dark surfaces layer desaturated grays and mute their accents; naively inverting to pure black with neon hues causes halation."),
  q!("exp_img_focus_ring", Image, "Which form is better for keyboard users?", "img/exp/focus-visible.png", "img/exp/focus-removed.png", "A visible focus ring is the keyboard cursor; removing the outline leaves tabbing users lost."),
  q!("exp_img_chart_axis", Image, "Which bar chart represents the data honestly?", "img/exp/axis-zero.png", "img/exp/axis-cropped.png", "Bars encode value by length, so the axis must start at zero; truncating it turns a 3% difference into a threefold visual."),
  q!("exp_img_line_height", Image, "Which long-form text block has the better line height?", "img/exp/leading-150.png", "img/exp/leading-115.png", "A wide measure needs roughly 1.5 leading so return sweeps land on the right line; 1.15 welds the lines together."),
  q!("exp_img_gray_contrast", Image, "Which caption gray passes accessibility contrast?", "img/exp/gray-aa.png", "img/exp/gray-faint.png", "The darker gray clears the 4.5:1 ratio body text needs; the fashionably faint one fails at 2.4:1."),
  q!("exp_img_touch_targets", Image, "Which mobile toolbar is better to tap?", "img/exp/targets-44.png", "img/exp/targets-24.png", "Touch targets need roughly 44px with space between them; 24px icons set flush guarantee mis-taps."),
  q!("exp_img_hanging_punct", Image, "Which pull quote is aligned better?", "img/exp/quote-hanging.png", "img/exp/quote-indented.png", "Hanging the quotation mark into the margin keeps the text edge optically straight; setting it inside pushes the first line visibly right."),
  q!("exp_img_motion", Image, "Which dropdown animation is better tuned?", "img/exp/motion-200ms.png", "img/exp/motion-800ms.png", "Interface motion should be felt, not watched: a 200ms ease-out confirms the action; an 800ms bounce makes every open a wait."),
  q!("exp_img_widows", Image, "Which card title wraps better?", "img/exp/title-balanced.png", "img/exp/title-widow.png", "Balancing the break avoids a single stranded word; the widow leaves one word alone on the second line."),
  q!("exp_img_gutter", Image, "Which responsive grid holds together at the breakpoint?", "img/exp/gutter-constant.png", "img/exp/gutter-drifting.png", "Gutters and margins keep one spacing system across breakpoints; letting them drift makes columns touch at some widths."),
  q!("exp_img_density", Image, "Which admin table balances density and scanability?", "img/exp/density-measured.png", "img/exp/density-crammed.png", "Generous row height with the key column emphasized scans fast; eight equal columns at 11px is data soup."),
  q!("exp_img_optical_margins", Image, "Which bulleted list has the better left edge?", "img/exp/bullets-hanging.png", "img/exp/bullets-inline.png", "Hanging indents keep wrapped lines aligned with the text, not the bullet; inline bullets break the reading edge on every wrap."),
  q!("exp_img_baseline_grid", Image, "Which two-column layout keeps its lines level?", "img/exp/columns-baseline.png", "img/exp/columns-drift.png", "Text in adjacent columns should share a baseline grid; mismatched leading makes the lines stagger and the page shimmer."),
  q!("exp_type_optical_size", Typeface, "Which cut for footnotes at 11px?", "Source Serif 4 Caption", "Source Serif 4 Display", "Caption cuts open their apertures and sturdy their strokes for small sizes; display cuts are drawn for 60px and clog below it."),
  q!("exp_type_longform", Typeface, "Which typeface for a 3,000-word essay?", "Literata", "Roboto Condensed", "Literata is a text serif with even color for immersion; a condensed UI sans tires the eye over long passages."),
  q!("exp_type_numerals", Typeface, "Which numeral style for a realtime metrics board?", "IBM Plex Mono (lining figures)", "Georgia (oldstyle figures)", "Lining tabular numerals hold steady as values tick; oldstyle figures bounce above and below the line."),
  q!("exp_type_multilingual", Typeface, "Which typeface for a UI shipping in forty languages?", "Noto Sans", "Futura", "Noto's coverage keeps Vietnamese, Greek, and Cyrillic in one voice; Futura falls back to mismatched system glyphs."),
  q!("exp_type_small_print", Typeface, "Which typeface for dense legal small print?", "Atkinson Hyperlegible", "Gill Sans Light", "Atkinson exaggerates letterform distinctions for low-vision readers; a light humanist sans blurs at footnote sizes."),
];

fn tier_items(tier: Tier) -> &'static [QuestionDef] {
  match tier {
    Tier::Beginner => BEGINNER_ITEMS,
    Tier::Mid => MID_ITEMS,
    Tier::Expert => EXPERT_ITEMS,
  }
}

/// The built-in catalog, one owned `Question` per table row.
pub fn builtin_catalog() -> Vec<Question> {
  let mut out = Vec::new();
  for tier in Tier::ALL {
    for def in tier_items(tier) {
      out.push(Question {
        id: def.id.to_string(),
        tier,
        kind: def.kind,
        prompt: def.prompt.to_string(),
        option_a: def.option_a.to_string(),
        option_b: def.option_b.to_string(),
        explanation: def.explanation.to_string(),
      });
    }
  }
  out
}

/// Convert a TOML bank into a catalog, naming each offending entry instead
/// of failing on the first serde surprise. Every field is optional at parse
/// time (see `QuestionCfg`), so presence is checked here, by id.
pub fn from_bank(bank: &[QuestionCfg]) -> Result<Vec<Question>, CatalogError> {
  let mut out = Vec::with_capacity(bank.len());
  for (idx, item) in bank.iter().enumerate() {
    let id = item.id.clone().unwrap_or_else(|| format!("bank_{idx}"));
    let tier_tag = required(&id, "tier", item.tier.as_deref())?;
    let tier = Tier::parse(&tier_tag).ok_or_else(|| CatalogError::BadItem {
      id: id.clone(),
      problem: format!("unknown tier '{tier_tag}' (expected beginner|mid|expert)"),
    })?;
    let kind_tag = required(&id, "kind", item.kind.as_deref())?;
    let kind = QuestionKind::parse(&kind_tag).ok_or_else(|| CatalogError::BadItem {
      id: id.clone(),
      problem: format!("unknown kind '{kind_tag}' (expected image|typeface)"),
    })?;
    let prompt = required(&id, "prompt", item.prompt.as_deref())?;
    let option_a = required(&id, "option_a", item.option_a.as_deref())?;
    let option_b = required(&id, "option_b", item.option_b.as_deref())?;
    out.push(Question {
      id,
      tier,
      kind,
      prompt,
      option_a,
      option_b,
      explanation: item.explanation.clone(),
    });
  }
  Ok(out)
}

fn required(id: &str, field: &str, value: Option<&str>) -> Result<String, CatalogError> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
    Some(_) => Err(CatalogError::BadItem { id: id.into(), problem: format!("empty {field}") }),
    None => Err(CatalogError::BadItem { id: id.into(), problem: format!("missing {field}") }),
  }
}

/// Load the configured bank if present, the built-ins otherwise, and reject
/// duplicate ids either way.
pub fn load(cfg: &GymConfig) -> Result<Vec<Question>, CatalogError> {
  let catalog = if cfg.questions.is_empty() { builtin_catalog() } else { from_bank(&cfg.questions)? };
  let mut seen = std::collections::HashSet::new();
  for q in &catalog {
    if !seen.insert(q.id.as_str()) {
      return Err(CatalogError::DuplicateId { id: q.id.clone() });
    }
  }
  Ok(catalog)
}

/// Check one tier's already-split kinds against the required composition.
pub fn check_tier(
  tier: Tier,
  images: &[&Question],
  typefaces: &[&Question],
  want: crate::config::Composition,
) -> Result<(), CatalogError> {
  if images.len() != want.image {
    return Err(CatalogError::Composition {
      tier: tier.as_str(),
      kind: QuestionKind::Image.as_str(),
      expected: want.image,
      found: images.len(),
      ids: join_ids(images),
    });
  }
  if typefaces.len() != want.typeface {
    return Err(CatalogError::Composition {
      tier: tier.as_str(),
      kind: QuestionKind::Typeface.as_str(),
      expected: want.typeface,
      found: typefaces.len(),
      ids: join_ids(typefaces),
    });
  }
  Ok(())
}

/// Validate every tier of `catalog` against the configured composition.
pub fn validate_composition(catalog: &[Question], cfg: &CatalogCfg) -> Result<(), CatalogError> {
  for tier in Tier::ALL {
    let images: Vec<&Question> =
      catalog.iter().filter(|q| q.tier == tier && q.kind == QuestionKind::Image).collect();
    let typefaces: Vec<&Question> =
      catalog.iter().filter(|q| q.tier == tier && q.kind == QuestionKind::Typeface).collect();
    check_tier(tier, &images, &typefaces, cfg.for_tier(tier))?;
  }
  Ok(())
}

fn join_ids(questions: &[&Question]) -> String {
  questions.iter().map(|q| q.id.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Composition;

  #[test]
  fn builtin_catalog_satisfies_default_composition() {
    let catalog = builtin_catalog();
    assert_eq!(catalog.len(), 60);
    validate_composition(&catalog, &CatalogCfg::default()).unwrap();
  }

  #[test]
  fn builtin_ids_are_unique() {
    let catalog = load(&GymConfig::default()).unwrap();
    assert_eq!(catalog.len(), 60);
  }

  #[test]
  fn composition_violation_names_the_offenders() {
    let mut catalog = builtin_catalog();
    // Drop one beginner image; the check must name the tier and kind.
    let victim = catalog.iter().position(|q| q.id == "beg_img_alignment").unwrap();
    catalog.remove(victim);
    let err = validate_composition(&catalog, &CatalogCfg::default()).unwrap_err();
    match err {
      CatalogError::Composition { tier, kind, expected, found, ids } => {
        assert_eq!(tier, "beginner");
        assert_eq!(kind, "image");
        assert_eq!(expected, 15);
        assert_eq!(found, 14);
        assert!(!ids.contains("beg_img_alignment"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn bank_with_unknown_tier_is_rejected_with_its_id() {
    let bank = vec![QuestionCfg {
      id: Some("bad_one".into()),
      tier: Some("grandmaster".into()),
      kind: Some("image".into()),
      prompt: Some("Which?".into()),
      option_a: Some("a.png".into()),
      option_b: Some("b.png".into()),
      explanation: String::new(),
    }];
    let err = from_bank(&bank).unwrap_err();
    assert_eq!(
      err,
      CatalogError::BadItem {
        id: "bad_one".into(),
        problem: "unknown tier 'grandmaster' (expected beginner|mid|expert)".into()
      }
    );
  }

  #[test]
  fn bank_entry_missing_its_tier_is_rejected_by_id() {
    // An incomplete entry must still parse as configuration and fail here
    // by name; it must never dissolve the whole file into the defaults.
    let cfg: GymConfig = toml::from_str(
      r#"
      [[questions]]
      id = "untagged"
      kind = "image"
      prompt = "Which layout?"
      option_a = "a.png"
      option_b = "b.png"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.questions.len(), 1);
    let err = from_bank(&cfg.questions).unwrap_err();
    assert_eq!(
      err,
      CatalogError::BadItem { id: "untagged".into(), problem: "missing tier".into() }
    );
  }

  #[test]
  fn bank_replaces_builtins_wholesale() {
    let mut cfg = GymConfig::default();
    cfg.questions = vec![QuestionCfg {
      id: None,
      tier: Some("mid".into()),
      kind: Some("typeface".into()),
      prompt: Some("Which face?".into()),
      option_a: Some("Inter".into()),
      option_b: Some("Papyrus".into()),
      explanation: String::new(),
    }];
    let catalog = load(&cfg).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].id, "bank_0");
    assert_eq!(catalog[0].tier, Tier::Mid);
    // A one-question bank then fails composition, as it should.
    let err = validate_composition(&catalog, &cfg.catalog).unwrap_err();
    assert!(matches!(err, CatalogError::Composition { .. }));
  }

  #[test]
  fn check_tier_accepts_exact_counts() {
    let catalog = builtin_catalog();
    let images: Vec<&Question> = catalog
      .iter()
      .filter(|q| q.tier == Tier::Expert && q.kind == QuestionKind::Image)
      .collect();
    let typefaces: Vec<&Question> = catalog
      .iter()
      .filter(|q| q.tier == Tier::Expert && q.kind == QuestionKind::Typeface)
      .collect();
    check_tier(Tier::Expert, &images, &typefaces, Composition { image: 15, typeface: 5 }).unwrap();
  }
}
