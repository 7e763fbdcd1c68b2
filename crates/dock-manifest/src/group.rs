use dock_types::ManifestItem;

/// Manifest lines of one order, with per-order totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderGroup<'a> {
    pub order_number: &'a str,
    pub items: Vec<&'a ManifestItem>,
    pub removed_count: usize,
    pub canceled_count: usize,
}

impl OrderGroup<'_> {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Lines of this order that will be shipped.
    pub fn shipping_count(&self) -> usize {
        self.total() - self.removed_count - self.canceled_count
    }
}

/// Counts over the whole manifest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManifestSummary {
    pub total: usize,
    pub removed: usize,
    pub canceled: usize,
    pub shipping: usize,
}

/// Group `items` by order number, keeping first-appearance order.
pub(crate) fn group_by_order<'a>(
    items: &'a [ManifestItem],
    is_removed: impl Fn(&str) -> bool,
) -> Vec<OrderGroup<'a>> {
    let mut groups: Vec<OrderGroup<'a>> = Vec::new();
    for item in items {
        let index = match groups
            .iter()
            .position(|g| g.order_number == item.order_number)
        {
            Some(index) => index,
            None => {
                groups.push(OrderGroup {
                    order_number: &item.order_number,
                    items: Vec::new(),
                    removed_count: 0,
                    canceled_count: 0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.items.push(item);
        if item.is_canceled() {
            group.canceled_count += 1;
        } else if is_removed(&item.barcode) {
            group.removed_count += 1;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_first_appearance_order() {
        let items = vec![
            ManifestItem::new("A1", "O2", Some("12")),
            ManifestItem::new("A2", "O1", Some("OUT")),
            ManifestItem::new("A3", "O2", Some("12")),
            ManifestItem::new("A4", "O1", Some("12")),
        ];
        let groups = group_by_order(&items, |b| b == "A3");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].order_number, "O2");
        assert_eq!(groups[0].total(), 2);
        assert_eq!(groups[0].removed_count, 1);
        assert_eq!(groups[0].shipping_count(), 1);

        assert_eq!(groups[1].order_number, "O1");
        assert_eq!(groups[1].canceled_count, 1);
        assert_eq!(groups[1].removed_count, 0);
        assert_eq!(groups[1].shipping_count(), 1);
    }

    #[test]
    fn empty_items_no_groups() {
        assert!(group_by_order(&[], |_| false).is_empty());
    }
}
