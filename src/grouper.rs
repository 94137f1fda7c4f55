/// Domain grouping: keeps tabs that share a domain in one tab group
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::domain::{
    UNKNOWN_DOMAIN, categorize, classify_domain, group_title, manageable_url, partition_by_domain,
};
use crate::error::{HostError, Result};
use crate::host::Host;
use crate::settings::Settings;
use crate::tab_data::{GroupColor, GroupId, GroupStyle, TabRecord};

/// Maps each domain to the tab group created for it
///
/// The map lives only in memory. `organize_all` rebuilds it from scratch;
/// `organize_one` only adds entries, and evicts one when the host says its
/// group is gone. Between full runs the two views may disagree.
pub struct DomainGrouper<H> {
    host: Rc<H>,
    groups: RefCell<HashMap<String, GroupId>>,
}

impl<H: Host> DomainGrouper<H> {
    pub fn new(host: Rc<H>) -> Self {
        DomainGrouper {
            host,
            groups: RefCell::new(HashMap::new()),
        }
    }

    pub fn group_for(&self, domain: &str) -> Option<GroupId> {
        self.groups.borrow().get(domain).copied()
    }

    pub fn known_groups(&self) -> usize {
        self.groups.borrow().len()
    }

    /// Regroup every tab in the current window by domain
    ///
    /// Only a failure to list the window's tabs is returned; a domain that
    /// cannot be grouped is logged and skipped.
    pub async fn organize_all(&self) -> Result<()> {
        let tabs = self.host.query_current_window().await?;
        let settings = Settings::load_or_default(self.host.sync()).await;

        self.groups.borrow_mut().clear();

        for (domain, members) in partition_by_domain(&tabs) {
            if members.len() < 2 {
                continue;
            }
            if let Err(e) = self
                .create_group(&domain, &members, settings.collapse_groups)
                .await
            {
                log::error!("Error creating group for domain {}: {}", domain, e);
            }
        }

        log::info!("Organized {} tabs into {} groups", tabs.len(), self.known_groups());
        Ok(())
    }

    /// Place a single new or navigated tab into its domain's group
    ///
    /// Never fails: host errors are logged and the tab is left where it is.
    pub async fn organize_one(&self, tab: &TabRecord) {
        let Some(url) = manageable_url(tab) else {
            return;
        };
        let domain = classify_domain(url);
        if domain == UNKNOWN_DOMAIN {
            return;
        }

        if let Err(e) = self.place_tab(tab, &domain).await {
            log::error!("Error organizing tab {}: {}", tab.id, e);
        }
    }

    async fn place_tab(&self, tab: &TabRecord, domain: &str) -> Result<()> {
        if let Some(group_id) = self.group_for(domain) {
            if let Err(e) = self.host.group_tabs(&[tab.id], Some(group_id)).await {
                log::debug!("Group {} for {} is gone ({}), forgetting it", group_id, domain, e);
                self.groups.borrow_mut().remove(domain);
            }
            return Ok(());
        }

        let tabs = self.host.query_current_window().await?;
        let same_domain = tabs
            .iter()
            .filter_map(manageable_url)
            .filter(|url| classify_domain(url) == domain)
            .count();

        if same_domain > 1 {
            let settings = Settings::load_or_default(self.host.sync()).await;
            self.create_group(domain, &[tab], settings.collapse_groups)
                .await?;
        }
        Ok(())
    }

    /// Group `tabs` (first tab creates the group), style it and remember it
    async fn create_group(
        &self,
        domain: &str,
        tabs: &[&TabRecord],
        collapsed: bool,
    ) -> Result<GroupId> {
        let Some((first, rest)) = tabs.split_first() else {
            return Err(HostError::api("tabs.group", "no tabs to group").into());
        };

        let category = categorize(first.url.as_deref().unwrap_or_default(), first.title.as_deref());
        let style = GroupStyle {
            title: group_title(domain, category),
            color: GroupColor::for_index(self.known_groups()),
            collapsed,
        };

        let group_id = self.host.group_tabs(&[first.id], None).await?;
        self.host.update_group(group_id, &style).await?;

        if !rest.is_empty() {
            let remaining: Vec<_> = rest.iter().map(|tab| tab.id).collect();
            self.host.group_tabs(&remaining, Some(group_id)).await?;
        }

        self.groups.borrow_mut().insert(domain.to_string(), group_id);
        Ok(group_id)
    }
}
