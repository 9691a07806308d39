/// Wraps a [`ListResourceClient`](crate::actor_framework::ListResourceClient)
/// in a page-specific client: constructor, list controls and the detail
/// modal under the entity's own name.
#[macro_export]
macro_rules! impl_list_client {
    ($client_name:ident, $resource:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                pub fn new(inner: $crate::actor_framework::ListResourceClient<$resource>) -> Self {
                    Self { inner }
                }

                /// The generic page client underneath.
                pub fn page(&self) -> &$crate::actor_framework::ListResourceClient<$resource> {
                    &self.inner
                }

                pub async fn snapshot(
                    &self,
                ) -> Result<$crate::actor_framework::ListSnapshot<$resource>, $crate::error::ResourceError> {
                    self.inner.snapshot().await
                }

                pub async fn settled(
                    &self,
                ) -> Result<$crate::actor_framework::ListSnapshot<$resource>, $crate::error::ResourceError> {
                    self.inner.settled().await
                }

                pub async fn set_filter(
                    &self,
                    name: &str,
                    value: impl Into<$crate::filters::FilterValue>,
                ) -> Result<(), $crate::error::ResourceError> {
                    self.inner.set_filter(name, value).await
                }

                pub async fn set_filters(
                    &self,
                    changes: Vec<(&str, $crate::filters::FilterValue)>,
                ) -> Result<(), $crate::error::ResourceError> {
                    self.inner.set_filters(changes).await
                }

                pub async fn set_page(&self, page: u32) -> Result<(), $crate::error::ResourceError> {
                    self.inner.set_page(page).await
                }

                pub async fn clear_filters(&self) -> Result<(), $crate::error::ResourceError> {
                    self.inner.clear_filters().await
                }

                pub async fn refresh(&self) -> Result<(), $crate::error::ResourceError> {
                    self.inner.refresh().await
                }

                pub async fn shutdown(&self) -> Result<(), $crate::error::ResourceError> {
                    self.inner.shutdown().await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<open_ $entity_name_snake>](&self, id: &str) -> Result<(), $crate::error::ResourceError> {
                    tracing::debug!("Sending request");
                    self.inner.open_detail(id).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<close_ $entity_name_snake>](&self) -> Result<(), $crate::error::ResourceError> {
                    tracing::debug!("Sending request");
                    self.inner.close_detail().await
                }

                /// Opens the detail and waits for it. `None` when the load failed
                /// or another detail replaced it meanwhile.
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](
                    &self,
                    id: &str,
                ) -> Result<Option<<$resource as $crate::actor_framework::Resource>::Detail>, $crate::error::ResourceError> {
                    tracing::debug!("Sending request");
                    self.inner.open_detail(id).await?;
                    let snapshot = self.inner.settled().await?;
                    Ok(match snapshot.detail.selected_id() {
                        Some(selected) if selected == id => snapshot.detail.detail().cloned(),
                        _ => None,
                    })
                }
            }
        }
    };
}

/// One named method per page action, forwarding to `perform`.
#[macro_export]
macro_rules! client_action {
    ($client:ty => fn $method:ident($param:ident: $param_type:ty) as $action:ident::$variant:ident(..)) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $param: $param_type) -> Result<(), $crate::error::ResourceError> {
                tracing::debug!("Sending request");
                self.inner.perform($action::$variant($param)).await
            }
        }
    };
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) as $action:ident::$variant:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<(), $crate::error::ResourceError> {
                tracing::debug!("Sending request");
                self.inner.perform($action::$variant { $($param),* }).await
            }
        }
    };
}
