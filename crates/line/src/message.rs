//! Outbound message encoding for the reply API.

use {
    pttbot_common::{ButtonMenu, CarouselColumn, ImageColumn, ReplyTemplate, TemplateAction},
    serde::{Serialize, Serializer},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(String),
    Template {
        /// Shown by clients that cannot render templates.
        alt_text: String,
        template: ReplyTemplate,
    },
}

impl OutboundMessage {
    pub fn template(alt_text: impl Into<String>, template: ReplyTemplate) -> Self {
        Self::Template {
            alt_text: alt_text.into(),
            template,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireMessage<'a> {
    Text {
        text: &'a str,
    },
    Template {
        #[serde(rename = "altText")]
        alt_text: &'a str,
        template: WireTemplate<'a>,
    },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireTemplate<'a> {
    Buttons {
        #[serde(rename = "thumbnailImageUrl")]
        thumbnail_image_url: &'a str,
        title: &'a str,
        text: &'a str,
        actions: Vec<WireAction<'a>>,
    },
    Carousel {
        columns: Vec<WireColumn<'a>>,
    },
    ImageCarousel {
        columns: Vec<WireImageColumn<'a>>,
    },
}

#[derive(Serialize)]
struct WireColumn<'a> {
    #[serde(rename = "thumbnailImageUrl")]
    thumbnail_image_url: &'a str,
    title: &'a str,
    text: &'a str,
    actions: Vec<WireAction<'a>>,
}

#[derive(Serialize)]
struct WireImageColumn<'a> {
    #[serde(rename = "imageUrl")]
    image_url: &'a str,
    action: WireAction<'a>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireAction<'a> {
    Postback { label: &'a str, data: &'a str },
    Message { label: &'a str, text: &'a str },
    Uri { label: &'a str, uri: &'a str },
}

impl<'a> From<&'a TemplateAction> for WireAction<'a> {
    fn from(action: &'a TemplateAction) -> Self {
        match action {
            TemplateAction::Postback { label, data } => Self::Postback { label, data },
            TemplateAction::Message { label, text } => Self::Message { label, text },
            TemplateAction::Uri { label, uri } => Self::Uri { label, uri },
        }
    }
}

fn actions(actions: &[TemplateAction]) -> Vec<WireAction<'_>> {
    actions.iter().map(WireAction::from).collect()
}

impl<'a> From<&'a CarouselColumn> for WireColumn<'a> {
    fn from(col: &'a CarouselColumn) -> Self {
        Self {
            thumbnail_image_url: &col.thumbnail_url,
            title: &col.title,
            text: &col.text,
            actions: actions(&col.actions),
        }
    }
}

impl<'a> From<&'a ImageColumn> for WireImageColumn<'a> {
    fn from(col: &'a ImageColumn) -> Self {
        Self {
            image_url: &col.image_url,
            action: WireAction::from(&col.action),
        }
    }
}

impl<'a> From<&'a ReplyTemplate> for WireTemplate<'a> {
    fn from(template: &'a ReplyTemplate) -> Self {
        match template {
            ReplyTemplate::ButtonMenu(ButtonMenu {
                thumbnail_url,
                title,
                text,
                actions: menu_actions,
            }) => Self::Buttons {
                thumbnail_image_url: thumbnail_url,
                title,
                text,
                actions: actions(menu_actions),
            },
            ReplyTemplate::ArticleCarousel(carousel) => Self::Carousel {
                columns: carousel.columns().iter().map(WireColumn::from).collect(),
            },
            ReplyTemplate::ImageCarousel(carousel) => Self::ImageCarousel {
                columns: carousel.columns().iter().map(WireImageColumn::from).collect(),
            },
        }
    }
}

impl Serialize for OutboundMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Text(text) => WireMessage::Text { text },
            Self::Template { alt_text, template } => WireMessage::Template {
                alt_text,
                template: WireTemplate::from(template),
            },
        };
        wire.serialize(serializer)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        pttbot_common::{ArticleCarousel, ImageCarousel},
        serde_json::json,
    };

    fn encode(message: &OutboundMessage) -> serde_json::Value {
        serde_json::to_value(message).unwrap()
    }

    #[test]
    fn text_message() {
        assert_eq!(
            encode(&OutboundMessage::Text("hi".into())),
            json!({"type": "text", "text": "hi"})
        );
    }

    #[test]
    fn buttons_template() {
        let menu = ReplyTemplate::ButtonMenu(ButtonMenu {
            thumbnail_url: "https://i.imgur.com/StcRAPB.png".into(),
            title: "💋表特看看".into(),
            text: "prompt".into(),
            actions: vec![
                TemplateAction::postback("最新表特", "action=Newest&page=0"),
                TemplateAction::message("||| 選單", "||| 選單"),
            ],
        });
        assert_eq!(
            encode(&OutboundMessage::template("alt", menu)),
            json!({
                "type": "template",
                "altText": "alt",
                "template": {
                    "type": "buttons",
                    "thumbnailImageUrl": "https://i.imgur.com/StcRAPB.png",
                    "title": "💋表特看看",
                    "text": "prompt",
                    "actions": [
                        {"type": "postback", "label": "最新表特", "data": "action=Newest&page=0"},
                        {"type": "message", "label": "||| 選單", "text": "||| 選單"}
                    ]
                }
            })
        );
    }

    #[test]
    fn carousel_template() {
        let carousel = ArticleCarousel::new(vec![CarouselColumn {
            thumbnail_url: "https://i.imgur.com/a.jpg".into(),
            title: "[正妹] a".into(),
            text: "1 😍\t0 😡".into(),
            actions: vec![TemplateAction::uri("👉 點我打開", "https://www.ptt.cc/a.html")],
        }])
        .unwrap();
        let value = encode(&OutboundMessage::template(
            "alt",
            ReplyTemplate::ArticleCarousel(carousel),
        ));
        assert_eq!(value["template"]["type"], "carousel");
        assert_eq!(
            value["template"]["columns"][0],
            json!({
                "thumbnailImageUrl": "https://i.imgur.com/a.jpg",
                "title": "[正妹] a",
                "text": "1 😍\t0 😡",
                "actions": [{"type": "uri", "label": "👉 點我打開", "uri": "https://www.ptt.cc/a.html"}]
            })
        );
    }

    #[test]
    fn image_carousel_template() {
        let carousel = ImageCarousel::new(vec![ImageColumn {
            image_url: "https://i.imgur.com/1.jpg".into(),
            action: TemplateAction::uri("👉 點我打開", "https://www.ptt.cc/a.html"),
        }])
        .unwrap();
        let value = encode(&OutboundMessage::template(
            "alt",
            ReplyTemplate::ImageCarousel(carousel),
        ));
        assert_eq!(
            value["template"],
            json!({
                "type": "image_carousel",
                "columns": [{
                    "imageUrl": "https://i.imgur.com/1.jpg",
                    "action": {"type": "uri", "label": "👉 點我打開", "uri": "https://www.ptt.cc/a.html"}
                }]
            })
        );
    }
}
