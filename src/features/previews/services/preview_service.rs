use crate::features::previews::dtos::{
    BuildPreviewDto, MapPreviewDto, MarkerDto, PopupContentDto,
};
use crate::shared::constants::{FOCUSED_MAP_ZOOM, INITIAL_MAP_ZOOM};
use crate::shared::types::GeoCoordinate;

/// Display fields shown in the marker popup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewFields {
    pub submitter_name: String,
    pub title: String,
    pub comment: String,
    pub photo_url: Option<String>,
}

/// Map marker handle, updated in place when the coordinate changes
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: GeoCoordinate,
    pub title: String,
}

/// Popup content, rebuilt only from committed field values
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub fields: PreviewFields,
}

/// A fully built map preview: center, zoom, marker and popup
#[derive(Debug, Clone, PartialEq)]
pub struct MapPreview {
    pub center: GeoCoordinate,
    pub zoom: u8,
    pub marker: Marker,
    pub popup: PopupContent,
}

/// One map-preview session, scoped to a single report form.
///
/// Owns the marker and popup handles outright - no process-wide map state.
/// Field edits land in a draft first; the popup reflects only committed
/// values, so typing never makes it flicker. Selecting a new photo replaces
/// the coordinate and re-centers the map; a failed extraction clears it.
#[derive(Debug, Default)]
pub struct PreviewSession {
    coordinate: Option<GeoCoordinate>,
    draft: PreviewFields,
    committed: PreviewFields,
    marker: Option<Marker>,
    popup: Option<PopupContent>,
}

impl PreviewSession {
    const MARKER_TITLE: &'static str = "Location";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record in-progress field edits without touching the popup.
    pub fn edit_fields(&mut self, fields: PreviewFields) {
        self.draft = fields;
    }

    /// Commit the draft fields and rebuild the popup from them.
    pub fn commit_fields(&mut self) {
        self.committed = self.draft.clone();
        if self.coordinate.is_some() {
            self.popup = Some(PopupContent {
                fields: self.committed.clone(),
            });
        }
    }

    /// Pin a new coordinate: re-center, zoom in, move the existing marker in
    /// place (or create the one marker this session will ever own), and
    /// rebuild the popup.
    pub fn set_coordinate(&mut self, coordinate: GeoCoordinate) {
        self.coordinate = Some(coordinate);
        match &mut self.marker {
            Some(marker) => marker.position = coordinate,
            None => {
                self.marker = Some(Marker {
                    position: coordinate,
                    title: Self::MARKER_TITLE.to_string(),
                })
            }
        }
        self.popup = Some(PopupContent {
            fields: self.committed.clone(),
        });
    }

    /// Drop the coordinate (extraction failed for the newly selected photo).
    pub fn clear_coordinate(&mut self) {
        self.coordinate = None;
        self.marker = None;
        self.popup = None;
    }

    pub fn zoom(&self) -> u8 {
        if self.coordinate.is_some() {
            FOCUSED_MAP_ZOOM
        } else {
            INITIAL_MAP_ZOOM
        }
    }

    /// The renderable preview, present once a coordinate is pinned.
    pub fn preview(&self) -> Option<MapPreview> {
        let center = self.coordinate?;
        Some(MapPreview {
            center,
            zoom: self.zoom(),
            marker: self.marker.clone()?,
            popup: self.popup.clone()?,
        })
    }
}

/// Builds map-preview payloads for the HTTP surface.
pub struct PreviewService;

impl PreviewService {
    pub fn new() -> Self {
        Self
    }

    /// Build a preview from committed field values and a pinned coordinate.
    pub fn build_preview(&self, coordinate: GeoCoordinate, dto: BuildPreviewDto) -> MapPreviewDto {
        let mut session = PreviewSession::new();
        session.edit_fields(PreviewFields {
            submitter_name: dto.name,
            title: dto.title,
            comment: dto.comment,
            photo_url: dto.photo_url,
        });
        session.commit_fields();
        session.set_coordinate(coordinate);

        // A session with a coordinate always yields a preview
        let preview = session.preview().expect("coordinate was just pinned");
        MapPreviewDto::from(preview)
    }
}

impl Default for PreviewService {
    fn default() -> Self {
        Self::new()
    }
}

impl From<MapPreview> for MapPreviewDto {
    fn from(preview: MapPreview) -> Self {
        Self {
            center: preview.center,
            zoom: preview.zoom,
            marker: MarkerDto {
                latitude: preview.marker.position.latitude,
                longitude: preview.marker.position.longitude,
                title: preview.marker.title,
            },
            popup: PopupContentDto {
                name: preview.popup.fields.submitter_name,
                title: preview.popup.fields.title,
                comment: preview.popup.fields.comment,
                photo_url: preview.popup.fields.photo_url,
            },
        }
    }
}
