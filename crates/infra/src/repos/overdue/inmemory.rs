use super::IOverdueMarkerRepo;
use coursebell_domain::{OverdueSendMarker, ID};
use std::sync::Mutex;

pub struct InMemoryOverdueMarkerRepo {
    markers: Mutex<Vec<OverdueSendMarker>>,
}

impl InMemoryOverdueMarkerRepo {
    pub fn new() -> Self {
        Self {
            markers: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryOverdueMarkerRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IOverdueMarkerRepo for InMemoryOverdueMarkerRepo {
    async fn insert(&self, marker: &OverdueSendMarker) -> anyhow::Result<()> {
        let mut markers = self.markers.lock().unwrap();
        if !markers.iter().any(|m| m.event_id == marker.event_id) {
            markers.push(marker.clone());
        }
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<OverdueSendMarker> {
        let markers = self.markers.lock().unwrap();
        markers.iter().find(|m| m.event_id == *event_id).cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn marker_insert_is_idempotent() {
        let repo = InMemoryOverdueMarkerRepo::new();
        let event_id = ID::new();

        repo.insert(&OverdueSendMarker {
            event_id: event_id.clone(),
            sent_at: 100,
        })
        .await
        .unwrap();
        repo.insert(&OverdueSendMarker {
            event_id: event_id.clone(),
            sent_at: 200,
        })
        .await
        .unwrap();

        // The first marker wins; the event only ever gets one pass.
        assert_eq!(repo.find(&event_id).await.unwrap().sent_at, 100);
    }
}
