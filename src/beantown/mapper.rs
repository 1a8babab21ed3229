use crate::model::JellyBean;
use crate::network::NetworkJellyBean;

impl NetworkJellyBean {
    /// Convert a remote bean into its stored form, stamped with the page it
    /// was fetched from.
    pub fn to_entity(&self, page: u32) -> JellyBean {
        JellyBean {
            bean_id: self.bean_id,
            group_name: self.group_name.clone(),
            ingredients: self.ingredients.clone(),
            flavor_name: self.flavor_name.clone(),
            description: self.description.clone(),
            color_group: self.color_group.clone(),
            background_color: self.background_color,
            image_url: self.image_url.clone(),
            gluten_free: self.gluten_free,
            sugar_free: self.sugar_free,
            seasonal: self.seasonal,
            kosher: self.kosher,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::network::fake::network_beans;

    #[test]
    fn copies_every_field_and_stamps_page() {
        let remote = &network_beans(6)[5];
        let entity = remote.to_entity(4);

        assert_eq!(entity.bean_id, 6);
        assert_eq!(entity.flavor_name, remote.flavor_name);
        assert_eq!(entity.group_name, remote.group_name);
        assert_eq!(entity.ingredients, remote.ingredients);
        assert_eq!(entity.background_color, remote.background_color);
        assert_eq!(entity.image_url, remote.image_url);
        assert_eq!(
            (entity.gluten_free, entity.sugar_free, entity.seasonal, entity.kosher),
            (true, true, false, true)
        );
        assert_eq!(entity.page, 4);
    }
}
