use uuid::Uuid;

use valora_domain::pagination::{Page, PageRequest};

use crate::domain::repository::NotificationRepository;
use crate::domain::types::Notification;
use crate::error::StoreError;

pub struct ListNotificationsUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> ListNotificationsUseCase<N> {
    pub async fn execute(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>, StoreError> {
        let page = page.clamped();
        let (items, total) = self.notifications.list(unread_only, page).await?;
        Ok(Page::new(items, page, total))
    }
}

pub struct UnreadCountUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> UnreadCountUseCase<N> {
    pub async fn execute(&self) -> Result<u64, StoreError> {
        self.notifications.unread_count().await
    }
}

pub struct MarkNotificationReadUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> MarkNotificationReadUseCase<N> {
    pub async fn execute(&self, id: Uuid) -> Result<(), StoreError> {
        if !self.notifications.mark_read(id).await? {
            return Err(StoreError::NotificationNotFound);
        }
        Ok(())
    }
}

pub struct MarkAllNotificationsReadUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> MarkAllNotificationsReadUseCase<N> {
    pub async fn execute(&self) -> Result<u64, StoreError> {
        self.notifications.mark_all_read().await
    }
}

pub struct DeleteNotificationUseCase<N: NotificationRepository> {
    pub notifications: N,
}

impl<N: NotificationRepository> DeleteNotificationUseCase<N> {
    pub async fn execute(&self, id: Uuid) -> Result<(), StoreError> {
        if !self.notifications.delete(id).await? {
            return Err(StoreError::NotificationNotFound);
        }
        Ok(())
    }
}
